use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, Thread};

/// The state of one in-flight call.
enum State<T> {
  Running,
  Complete(T),
  // The leader unwound before producing a value.
  Abandoned,
}

struct Inner<T> {
  state: State<T>,
  waiters: VecDeque<Thread>,
}

/// A call that several threads can wait on. Only the leader produces the value.
struct Call<T> {
  inner: Mutex<Inner<T>>,
}

impl<T: Clone> Call<T> {
  fn new() -> Self {
    Self {
      inner: Mutex::new(Inner {
        state: State::Running,
        waiters: VecDeque::new(),
      }),
    }
  }

  /// Settles the call and wakes every waiter.
  fn settle(&self, state: State<T>) {
    let mut inner = self.inner.lock();
    inner.state = state;
    for waiter in inner.waiters.drain(..) {
      waiter.unpark();
    }
  }

  /// Blocks the current thread until the leader settles the call.
  fn wait(&self, key: &str) -> T {
    let mut inner = self.inner.lock();
    loop {
      match &inner.state {
        State::Complete(value) => return value.clone(),
        State::Abandoned => panic!("coalesced call for key {key:?} panicked in its leader"),
        State::Running => {
          inner.waiters.push_back(thread::current());
          drop(inner); // Unlock before parking.
          thread::park();
          inner = self.inner.lock();
        }
      }
    }
  }
}

/// Collapses concurrent calls for the same key into one execution.
///
/// The first caller for a key becomes the leader and runs the producer; callers
/// arriving while it runs block and receive a clone of the leader's result.
/// Once the leader finishes, the key is forgotten: the next wave of callers
/// runs the producer again. Nothing is memoised beyond the in-flight window.
///
/// The internal map is only locked to register, find or remove a call, never
/// while a producer runs, so different keys never wait on each other.
pub struct Coalescer<T> {
  calls: Mutex<HashMap<String, Arc<Call<T>>>>,
}

impl<T> Default for Coalescer<T> {
  fn default() -> Self {
    Self {
      calls: Mutex::new(HashMap::new()),
    }
  }
}

impl<T> fmt::Debug for Coalescer<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Coalescer")
      .field("in_flight", &self.calls.lock().len())
      .finish()
  }
}

impl<T: Clone> Coalescer<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Runs `producer` for `key` unless a call for `key` is already in flight,
  /// in which case this waits for that call and returns its result.
  ///
  /// # Panics
  ///
  /// If the leader's producer panics, the leader's panic propagates and every
  /// waiter of that call panics as well.
  pub fn call<F>(&self, key: &str, producer: F) -> T
  where
    F: FnOnce() -> T,
  {
    let call = {
      let mut calls = self.calls.lock();
      if let Some(existing) = calls.get(key) {
        let existing = existing.clone();
        drop(calls);
        return existing.wait(key);
      }
      let call = Arc::new(Call::new());
      calls.insert(key.to_owned(), call.clone());
      call
    };

    let mut leader = Leader {
      group: self,
      key,
      call: &call,
      settled: false,
    };
    let value = producer();
    leader.finish(State::Complete(value.clone()));
    value
  }

  /// Number of keys with a call currently in flight.
  pub fn in_flight(&self) -> usize {
    self.calls.lock().len()
  }

  fn forget(&self, key: &str, call: &Arc<Call<T>>) {
    let mut calls = self.calls.lock();
    if calls.get(key).is_some_and(|current| Arc::ptr_eq(current, call)) {
      calls.remove(key);
    }
  }
}

// Settles the leader's call on every exit path, including unwinding.
struct Leader<'a, T: Clone> {
  group: &'a Coalescer<T>,
  key: &'a str,
  call: &'a Arc<Call<T>>,
  settled: bool,
}

impl<T: Clone> Leader<'_, T> {
  fn finish(&mut self, state: State<T>) {
    self.settled = true;
    self.call.settle(state);
    self.group.forget(self.key, self.call);
  }
}

impl<T: Clone> Drop for Leader<'_, T> {
  fn drop(&mut self) {
    if !self.settled {
      self.finish(State::Abandoned);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::panic::{self, AssertUnwindSafe};
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Barrier;
  use std::time::Duration;

  #[test]
  fn single_caller_runs_producer() {
    let group = Coalescer::new();
    assert_eq!(group.call("k", || 7), 7);
    assert_eq!(group.in_flight(), 0);
  }

  #[test]
  fn waiters_share_the_leaders_result() {
    let group = Arc::new(Coalescer::new());
    let runs = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
      .map(|_| {
        let group = group.clone();
        let runs = runs.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
          barrier.wait();
          group.call("same", || {
            thread::sleep(Duration::from_millis(100));
            runs.fetch_add(1, Ordering::SeqCst) + 1
          })
        })
      })
      .collect();

    let results: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|&r| r == 1), "results: {results:?}");
  }

  #[test]
  fn different_keys_run_independently() {
    let group = Coalescer::new();
    let a = group.call("a", || "a");
    let b = group.call("b", || "b");
    assert_eq!((a, b), ("a", "b"));
  }

  #[test]
  fn panicking_leader_releases_the_key() {
    let group = Coalescer::<u32>::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
      group.call("boom", || panic!("producer failed"));
    }));
    assert!(outcome.is_err());
    assert_eq!(group.in_flight(), 0);

    // The next wave runs normally.
    assert_eq!(group.call("boom", || 3), 3);
  }
}
