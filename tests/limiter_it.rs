// std
use std::{
	sync::{
		Arc, Barrier,
		atomic::{AtomicUsize, Ordering},
	},
	thread,
	time::{Duration, Instant},
};
// crates.io
use parking_lot::Mutex;

mod common;

#[test]
fn five_callers_on_three_permits_split_across_windows() {
	let window = Duration::from_secs(1);
	let limiter = common::limiter(3, window);
	let started = limiter.window_started_at();
	let barrier = Arc::new(Barrier::new(5));
	let handles = (0..5)
		.map(|_| {
			let limiter = limiter.clone();
			let barrier = barrier.clone();

			thread::spawn(move || {
				barrier.wait();
				limiter.acquire();

				started.elapsed()
			})
		})
		.collect::<Vec<_>>();
	let mut elapsed = handles
		.into_iter()
		.map(|handle| handle.join().expect("Caller thread should not panic."))
		.collect::<Vec<_>>();

	elapsed.sort();

	assert!(elapsed[..3].iter().all(|at| *at < Duration::from_millis(500)));
	assert!(elapsed[3..].iter().all(|at| *at >= window));
	// The refreshed window credited three permits and two were spent.
	assert_eq!(limiter.available_permits(), 1);
}

#[test]
fn single_permit_window_is_never_double_reset() {
	let window = Duration::from_millis(100);
	let limiter = common::limiter(1, window);
	let deadline = limiter.window_started_at() + Duration::from_secs(1);
	let admitted = Arc::new(AtomicUsize::new(0));
	let starts = Arc::new(Mutex::new(Vec::new()));
	let handles = (0..50)
		.map(|_| {
			let limiter = limiter.clone();
			let admitted = admitted.clone();
			let starts = starts.clone();

			thread::spawn(move || {
				while limiter.acquire_until(deadline) {
					if Instant::now() < deadline {
						admitted.fetch_add(1, Ordering::SeqCst);
					}

					starts.lock().push(limiter.window_started_at());
				}
			})
		})
		.collect::<Vec<_>>();

	for handle in handles {
		handle.join().expect("Spinning thread should not panic.");
	}

	let admitted = admitted.load(Ordering::SeqCst);

	assert!((9..=11).contains(&admitted), "Admitted {admitted} calls in one second.");
	assert_eq!(limiter.waiting(), 0, "Timed-out waiters must leave the queue.");

	let mut starts = starts.lock().clone();

	starts.dedup();

	assert!(starts.len() <= 11, "Observed {} distinct windows.", starts.len());
}

#[test]
fn back_to_back_calls_wait_a_full_window() {
	let window = Duration::from_millis(200);
	let limiter = common::limiter(1, window);

	limiter.acquire();

	let first_window = limiter.window_started_at();

	limiter.acquire();

	assert!(first_window.elapsed() >= window);
	assert!(limiter.window_started_at() >= first_window + window);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn threads_and_tasks_all_eventually_pass() {
	let limiter = common::limiter(5, Duration::from_millis(50));
	let admitted = Arc::new(AtomicUsize::new(0));
	let threads = (0..20)
		.map(|_| {
			let limiter = limiter.clone();
			let admitted = admitted.clone();

			thread::spawn(move || {
				limiter.acquire();
				admitted.fetch_add(1, Ordering::SeqCst);
			})
		})
		.collect::<Vec<_>>();
	let tasks = (0..20)
		.map(|_| {
			let limiter = limiter.clone();
			let admitted = admitted.clone();

			tokio::spawn(async move {
				limiter.acquire_async().await;
				admitted.fetch_add(1, Ordering::SeqCst);
			})
		})
		.collect::<Vec<_>>();

	for task in tasks {
		tokio::time::timeout(Duration::from_secs(5), task)
			.await
			.expect("Async waiter should be admitted.")
			.expect("Async waiter should not panic.");
	}

	tokio::task::spawn_blocking(move || {
		for thread in threads {
			thread.join().expect("Blocking waiter should not panic.");
		}
	})
	.await
	.expect("Join helper should not panic.");

	assert_eq!(admitted.load(Ordering::SeqCst), 40);
	assert_eq!(limiter.waiting(), 0);
}

#[tokio::test]
async fn async_waiters_are_served_in_arrival_order() {
	let limiter = common::limiter(1, Duration::from_millis(80));
	let order = Arc::new(Mutex::new(Vec::new()));

	limiter.acquire_async().await;

	let mut tasks = Vec::new();

	for id in 0..3_usize {
		let limiter_task = limiter.clone();
		let order_task = order.clone();

		tasks.push(tokio::spawn(async move {
			limiter_task.acquire_async().await;
			order_task.lock().push(id);
		}));

		while limiter.waiting() + order.lock().len() < id + 1 {
			tokio::task::yield_now().await;
		}
	}

	for task in tasks {
		task.await.expect("Waiter task should not panic.");
	}

	assert_eq!(*order.lock(), vec![0, 1, 2]);
}

#[tokio::test]
async fn cancelled_head_does_not_block_the_next_waiter() {
	let window = Duration::from_millis(100);
	let limiter = common::limiter(1, window);

	limiter.acquire_async().await;

	let head = {
		let limiter = limiter.clone();

		tokio::spawn(async move { limiter.acquire_async().await })
	};

	while limiter.waiting() < 1 {
		tokio::task::yield_now().await;
	}

	let next = {
		let limiter = limiter.clone();

		tokio::spawn(async move { limiter.acquire_async().await })
	};

	while limiter.waiting() < 2 {
		tokio::task::yield_now().await;
	}

	head.abort();

	let _ = head.await;

	tokio::time::timeout(window * 3, next)
		.await
		.expect("The next waiter should be admitted once the window rolls over.")
		.expect("Next waiter should not panic.");

	assert_eq!(limiter.available_permits(), 0, "Only the surviving waiter spent a permit.");
	assert_eq!(limiter.waiting(), 0);
}
