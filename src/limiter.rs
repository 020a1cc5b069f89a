//! Process-wide admission gate that caps outbound calls per fixed time window.
//!
//! [`RateLimiter`] keeps one permit counter and one window timestamp behind a single
//! [`Mutex`]. Callers that find the budget spent join a FIFO ticket queue and sleep until
//! they reach the head and the window rolls over; nobody polls. Threads park on a
//! [`Condvar`], async tasks wait on a [`tokio::sync::Notify`] raced against a timer, and both
//! kinds share the same queue so neither can overtake the other.
//!
//! The window is refreshed lazily: the first head-of-queue caller that observes a fully
//! elapsed window resets the budget and stamps the new window start with its own `now`.

mod rate;
mod window;

pub use rate::*;

// crates.io
use tokio::sync::Notify;
// self
use crate::{
	_prelude::*,
	limiter::window::{Gate, Turn},
	obs::{self, OpKind, OpOutcome},
};

/// Fair, blocking fixed-window rate limiter.
///
/// Share it behind an [`Arc`]; every method takes `&self`.
pub struct RateLimiter {
	gate: Mutex<Gate>,
	ready: Condvar,
	ready_async: Notify,
}
impl RateLimiter {
	/// Creates a limiter whose first window starts now with a full budget.
	pub fn new(limit: RateLimit) -> Self {
		Self {
			gate: Mutex::new(Gate::new(limit, Instant::now())),
			ready: Condvar::new(),
			ready_async: Notify::new(),
		}
	}

	/// Validates `capacity` and `window`, then creates the limiter.
	pub fn with_capacity(capacity: u32, window: Duration) -> Result<Self, RateLimitError> {
		Ok(Self::new(RateLimit::new(capacity, window)?))
	}

	/// Number of admissions allowed per window.
	pub fn capacity(&self) -> u32 {
		self.gate.lock().window.capacity()
	}

	/// Window length.
	pub fn window(&self) -> Duration {
		self.gate.lock().window.length()
	}

	/// Permits left in the current window, as last refreshed.
	pub fn available_permits(&self) -> u32 {
		self.gate.lock().window.available()
	}

	/// Instant the current window began.
	pub fn window_started_at(&self) -> Instant {
		self.gate.lock().window.started_at()
	}

	/// Number of callers currently queued for a permit.
	pub fn waiting(&self) -> usize {
		self.gate.lock().waiting()
	}

	/// Takes a permit only if one is available right now and nobody is queued.
	pub fn try_acquire(&self) -> bool {
		let admitted = self.gate.lock().try_admit(Instant::now());

		if admitted {
			obs::record_op_outcome(OpKind::Admission, OpOutcome::Success);
		}

		admitted
	}

	/// Blocks the calling thread until a permit is granted.
	///
	/// Never fails and never gives up; with a positive window every caller is eventually
	/// admitted in the order it started waiting.
	pub fn acquire(&self) {
		let admitted = self.wait_for_permit(None);

		debug_assert!(admitted, "Unbounded waits always end with a permit.");
	}

	/// Blocks for at most `timeout`; returns `false` if no permit was granted in time.
	pub fn acquire_timeout(&self, timeout: Duration) -> bool {
		match Instant::now().checked_add(timeout) {
			Some(deadline) => self.wait_for_permit(Some(deadline)),
			None => self.wait_for_permit(None),
		}
	}

	/// Blocks until `deadline` at the latest; returns `false` if no permit was granted.
	///
	/// A caller that gives up leaves the queue without consuming any budget.
	pub fn acquire_until(&self, deadline: Instant) -> bool {
		self.wait_for_permit(Some(deadline))
	}

	/// Suspends the calling task until a permit is granted.
	///
	/// Dropping the returned future before it resolves withdraws the caller from the queue
	/// without consuming any budget.
	pub async fn acquire_async(&self) {
		let queued_at = Instant::now();
		let ticket = {
			let mut gate = self.gate.lock();

			if gate.try_admit(queued_at) {
				obs::record_op_outcome(OpKind::Admission, OpOutcome::Success);

				return;
			}

			gate.enqueue()
		};
		let mut pending = PendingTicket { limiter: self, ticket: Some(ticket) };

		obs::record_op_outcome(OpKind::Admission, OpOutcome::Queued);

		loop {
			let notified = self.ready_async.notified();

			tokio::pin!(notified);
			// Register before inspecting the gate so a wake-up between the two is not lost.
			notified.as_mut().enable();

			let turn = self.gate.lock().poll(ticket, Instant::now());

			match turn {
				Turn::Granted => {
					pending.ticket = None;

					self.wake_waiters();
					self.record_admitted(queued_at);

					return;
				},
				Turn::RefillAt(refill_at) => {
					tokio::select! {
						_ = tokio::time::sleep_until(refill_at.into()) => {},
						_ = notified => {},
					}
				},
				Turn::Queued => notified.await,
			}
		}
	}

	fn wait_for_permit(&self, deadline: Option<Instant>) -> bool {
		let queued_at = Instant::now();
		let mut gate = self.gate.lock();

		if gate.try_admit(queued_at) {
			obs::record_op_outcome(OpKind::Admission, OpOutcome::Success);

			return true;
		}

		let ticket = gate.enqueue();

		obs::record_op_outcome(OpKind::Admission, OpOutcome::Queued);

		loop {
			let now = Instant::now();
			let refill_at = match gate.poll(ticket, now) {
				Turn::Granted => {
					drop(gate);

					self.wake_waiters();
					self.record_admitted(queued_at);

					return true;
				},
				Turn::RefillAt(refill_at) => Some(refill_at),
				Turn::Queued => None,
			};

			if deadline.is_some_and(|deadline| now >= deadline) {
				gate.cancel(ticket);
				drop(gate);

				self.wake_waiters();
				obs::record_op_outcome(OpKind::Admission, OpOutcome::Abandoned);

				return false;
			}

			match earliest(refill_at, deadline) {
				Some(wake_at) => {
					self.ready.wait_until(&mut gate, wake_at);
				},
				None => self.ready.wait(&mut gate),
			}
		}
	}

	// Every queue change may promote a new head, so all waiters re-check.
	fn wake_waiters(&self) {
		self.ready.notify_all();
		self.ready_async.notify_waiters();
	}

	fn record_admitted(&self, queued_at: Instant) {
		obs::record_op_outcome(OpKind::Admission, OpOutcome::Success);
		obs::record_admission_wait(queued_at.elapsed());
	}
}
impl Debug for RateLimiter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let gate = self.gate.lock();

		f.debug_struct("RateLimiter")
			.field("capacity", &gate.window.capacity())
			.field("window", &gate.window.length())
			.field("available", &gate.window.available())
			.field("waiting", &gate.waiting())
			.finish()
	}
}

// Withdraws an async waiter whose future was dropped before admission.
struct PendingTicket<'a> {
	limiter: &'a RateLimiter,
	ticket: Option<u64>,
}
impl Drop for PendingTicket<'_> {
	fn drop(&mut self) {
		if let Some(ticket) = self.ticket.take() {
			let removed = self.limiter.gate.lock().cancel(ticket);

			if removed {
				self.limiter.wake_waiters();
				obs::record_op_outcome(OpKind::Admission, OpOutcome::Abandoned);
			}
		}
	}
}

fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
	match (a, b) {
		(Some(a), Some(b)) => Some(a.min(b)),
		(a, None) => a,
		(None, b) => b,
	}
}
