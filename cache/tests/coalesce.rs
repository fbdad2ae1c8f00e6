use fibre_groupcache::Coalescer;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc, Barrier,
};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_concurrent_callers_share_one_result() {
  let num_threads = 16;
  let group = Arc::new(Coalescer::<usize>::new());
  let counter = Arc::new(AtomicUsize::new(0));
  let barrier = Arc::new(Barrier::new(num_threads));
  let mut handles = vec![];

  for _ in 0..num_threads {
    let group = group.clone();
    let counter = counter.clone();
    let barrier = barrier.clone();
    handles.push(thread::spawn(move || {
      barrier.wait();
      group.call("key", || {
        // Long enough for every thread to join the flight.
        thread::sleep(Duration::from_millis(200));
        counter.fetch_add(1, Ordering::SeqCst) + 1
      })
    }));
  }

  let results: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
  assert!(results.iter().all(|&r| r == 1), "results: {results:?}");
  assert_eq!(counter.load(Ordering::SeqCst), 1);
  assert_eq!(group.in_flight(), 0);

  // Once the flight has landed, the next call runs the producer again.
  let next = group.call("key", || counter.fetch_add(1, Ordering::SeqCst) + 1);
  assert_eq!(next, 2);
  assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_distinct_keys_run_independently() {
  let group = Arc::new(Coalescer::<String>::new());
  let runs = Arc::new(AtomicUsize::new(0));
  let barrier = Arc::new(Barrier::new(4));
  let start = Instant::now();

  let handles: Vec<_> = (0..4)
    .map(|i| {
      let group = group.clone();
      let runs = runs.clone();
      let barrier = barrier.clone();
      thread::spawn(move || {
        barrier.wait();
        let key = format!("key-{i}");
        group.call(&key, || {
          runs.fetch_add(1, Ordering::SeqCst);
          thread::sleep(Duration::from_millis(200));
          key.to_uppercase()
        })
      })
    })
    .collect();

  let mut results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
  results.sort();
  assert_eq!(results, vec!["KEY-0", "KEY-1", "KEY-2", "KEY-3"]);
  assert_eq!(runs.load(Ordering::SeqCst), 4);

  // Four 200ms producers back to back would take 800ms.
  let elapsed = start.elapsed();
  assert!(
    elapsed < Duration::from_millis(600),
    "producers for different keys were serialized: {elapsed:?}"
  );
}

#[test]
fn test_errors_are_shared_too() {
  let group = Arc::new(Coalescer::<Result<u32, String>>::new());
  let barrier = Arc::new(Barrier::new(8));

  let handles: Vec<_> = (0..8)
    .map(|_| {
      let group = group.clone();
      let barrier = barrier.clone();
      thread::spawn(move || {
        barrier.wait();
        group.call("broken", || {
          thread::sleep(Duration::from_millis(100));
          Err("backend down".to_string())
        })
      })
    })
    .collect();

  for handle in handles {
    assert_eq!(handle.join().unwrap(), Err("backend down".to_string()));
  }
}
