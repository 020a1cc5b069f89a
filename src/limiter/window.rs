//! Fixed-window permit counter and the FIFO ticket queue guarded together by the limiter.
//!
//! Everything here is synchronous and takes `now` explicitly so the state machine can be
//! exercised without sleeping.

// self
use crate::{_prelude::*, limiter::RateLimit};

/// Permit budget for the current window.
#[derive(Clone, Debug)]
pub(crate) struct Window {
	capacity: u32,
	length: Duration,
	available: u32,
	started_at: Instant,
}
impl Window {
	pub(crate) fn new(limit: RateLimit, now: Instant) -> Self {
		let capacity = limit.requests().get();

		Self { capacity, length: limit.window(), available: capacity, started_at: now }
	}

	pub(crate) fn capacity(&self) -> u32 {
		self.capacity
	}

	pub(crate) fn length(&self) -> Duration {
		self.length
	}

	pub(crate) fn available(&self) -> u32 {
		self.available
	}

	pub(crate) fn started_at(&self) -> Instant {
		self.started_at
	}

	/// Instant at which the current window may be refreshed.
	pub(crate) fn ends_at(&self) -> Instant {
		self.started_at + self.length
	}

	/// Takes one permit, refreshing the window first if it has fully elapsed.
	///
	/// Returns the refresh instant when no permit is available.
	pub(crate) fn try_take(&mut self, now: Instant) -> Result<(), Instant> {
		// Leftovers from an elapsed window never carry over into the next one.
		self.refresh(now);

		if self.available == 0 {
			return Err(self.ends_at());
		}

		self.available -= 1;

		Ok(())
	}

	fn refresh(&mut self, now: Instant) {
		// `Instant` is monotonic, but never let the start move backward.
		if now > self.started_at && now.duration_since(self.started_at) >= self.length {
			self.available = self.capacity;
			self.started_at = now;
		}
	}
}

/// Result of polling the gate on behalf of one ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Turn {
	/// A permit was taken and the ticket left the queue.
	Granted,
	/// The ticket is at the head but the window is spent until the given instant.
	RefillAt(Instant),
	/// Other tickets are ahead.
	Queued,
}

/// Shared state behind the limiter's single mutex.
#[derive(Debug)]
pub(crate) struct Gate {
	pub(crate) window: Window,
	queue: VecDeque<u64>,
	next_ticket: u64,
}
impl Gate {
	pub(crate) fn new(limit: RateLimit, now: Instant) -> Self {
		Self { window: Window::new(limit, now), queue: VecDeque::new(), next_ticket: 0 }
	}

	pub(crate) fn waiting(&self) -> usize {
		self.queue.len()
	}

	/// Takes a permit immediately when nobody is queued.
	pub(crate) fn try_admit(&mut self, now: Instant) -> bool {
		self.queue.is_empty() && self.window.try_take(now).is_ok()
	}

	/// Appends a new ticket to the queue.
	pub(crate) fn enqueue(&mut self) -> u64 {
		let ticket = self.next_ticket;

		self.next_ticket = self.next_ticket.wrapping_add(1);
		self.queue.push_back(ticket);

		ticket
	}

	/// Advances `ticket` if it is at the head of the queue.
	pub(crate) fn poll(&mut self, ticket: u64, now: Instant) -> Turn {
		if self.queue.front() != Some(&ticket) {
			return Turn::Queued;
		}

		match self.window.try_take(now) {
			Ok(()) => {
				self.queue.pop_front();

				Turn::Granted
			},
			Err(refill_at) => Turn::RefillAt(refill_at),
		}
	}

	/// Removes an abandoned ticket; returns `true` if it was still queued.
	pub(crate) fn cancel(&mut self, ticket: u64) -> bool {
		match self.queue.iter().position(|queued| *queued == ticket) {
			Some(index) => {
				self.queue.remove(index);

				true
			},
			None => false,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn limit(requests: u32, window_ms: u64) -> RateLimit {
		RateLimit::new(requests, Duration::from_millis(window_ms))
			.expect("Test rate limit should be valid.")
	}

	#[test]
	fn window_grants_capacity_then_reports_refill_instant() {
		let start = Instant::now();
		let mut window = Window::new(limit(3, 1_000), start);

		for _ in 0..3 {
			window.try_take(start).expect("Permits within capacity should be granted.");
		}

		assert_eq!(window.available(), 0);
		assert_eq!(window.try_take(start + Duration::from_millis(999)), Err(window.ends_at()));
		assert_eq!(window.started_at(), start);
	}

	#[test]
	fn window_refreshes_exactly_once_per_elapsed_window() {
		let start = Instant::now();
		let mut window = Window::new(limit(2, 100), start);

		window.try_take(start).expect("First permit should be granted.");
		window.try_take(start).expect("Second permit should be granted.");

		let boundary = start + Duration::from_millis(100);

		window.try_take(boundary).expect("A full window later the budget should refresh.");

		assert_eq!(window.started_at(), boundary);
		assert_eq!(window.available(), 1);

		window.try_take(boundary).expect("Refreshed budget should hold the full capacity.");

		assert_eq!(window.try_take(boundary + Duration::from_millis(50)), Err(window.ends_at()));
		assert_eq!(window.started_at(), boundary, "An unexpired window must not be reset.");
	}

	#[test]
	fn leftover_permits_do_not_stack_on_a_fresh_window() {
		let start = Instant::now();
		let mut window = Window::new(limit(3, 1_000), start);

		window.try_take(start).expect("First permit should be granted.");

		let burst_at = start + Duration::from_secs(5);
		let granted = (0..10_u64)
			.filter(|step| window.try_take(burst_at + Duration::from_micros(*step)).is_ok())
			.count();

		assert_eq!(granted, 3, "A burst inside one window must stay within capacity.");
		assert_eq!(window.started_at(), burst_at);
		assert_eq!(window.available(), 0);
	}

	#[test]
	fn window_start_never_moves_backward() {
		let start = Instant::now() + Duration::from_secs(1);
		let mut window = Window::new(limit(1, 10), start);

		window.try_take(start).expect("First permit should be granted.");

		assert!(window.try_take(start - Duration::from_millis(500)).is_err());
		assert_eq!(window.started_at(), start);

		let mut observed = vec![window.started_at()];

		for step in 1..=5 {
			let now = start + Duration::from_millis(10 * step);

			window.try_take(now).expect("Each elapsed window should yield a permit.");
			observed.push(window.started_at());
		}

		assert!(observed.windows(2).all(|pair| pair[0] <= pair[1]));
	}

	#[test]
	fn gate_serves_tickets_in_fifo_order() {
		let start = Instant::now();
		let mut gate = Gate::new(limit(1, 100), start);

		assert!(gate.try_admit(start));

		let first = gate.enqueue();
		let second = gate.enqueue();
		let refill = start + Duration::from_millis(100);

		assert_eq!(gate.poll(second, refill), Turn::Queued);
		assert_eq!(gate.poll(first, start), Turn::RefillAt(refill));
		assert_eq!(gate.poll(first, refill), Turn::Granted);
		assert_eq!(gate.waiting(), 1);
		assert!(!gate.try_admit(refill + Duration::from_millis(200)), "Queued tickets go first.");
		assert_eq!(gate.poll(second, refill + Duration::from_millis(200)), Turn::Granted);
		assert_eq!(gate.waiting(), 0);
	}

	#[test]
	fn cancelled_ticket_releases_head_without_spending_budget() {
		let start = Instant::now();
		let mut gate = Gate::new(limit(1, 100), start);

		assert!(gate.try_admit(start));

		let first = gate.enqueue();
		let second = gate.enqueue();

		assert!(gate.cancel(first));
		assert!(!gate.cancel(first));
		assert_eq!(gate.window.available(), 0);

		let refill = start + Duration::from_millis(100);

		assert_eq!(gate.poll(second, refill), Turn::Granted);
		assert_eq!(gate.window.available(), 0);
	}
}
