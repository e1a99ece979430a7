//! Compute-once lazy field.
//!
//! Responsibilities:
//! - Resolve a field's value on first access, exactly once, even when many
//!   threads race on the first access.
//! - Publish the resolved value to every caller; later accesses return the
//!   cached value without re-invoking the resolver.
//! - Keep resolver failures retryable: an error leaves the field unresolved
//!   so the next access runs the resolver again.
//!
//! The state machine is explicit (`Unresolved -> Resolving -> Resolved`) and
//! guarded by a mutex; racing callers block on a condvar until the single
//! resolution publishes. Unit tests at the bottom cover the race contract.

use std::sync::{Condvar, Mutex};

use tracing::trace;

use crate::error::AfResult;

type Resolver<T> = Box<dyn Fn() -> AfResult<T> + Send + Sync>;

enum LazyState<T> {
    Unresolved,
    Resolving,
    Resolved(T),
}

/// A thread-safe, single-assignment cell resolved on demand by a closure
/// captured at construction.
///
/// The cached value is never invalidated; callers needing fresh data must
/// obtain a new object (and with it a new field instance).
pub struct LazyField<T> {
    state: Mutex<LazyState<T>>,
    ready: Condvar,
    resolver: Resolver<T>,
}

/// Resets `Resolving` back to `Unresolved` if the resolver unwinds, so that
/// waiting threads are released instead of blocking forever.
struct ResolveGuard<'a, T> {
    field: &'a LazyField<T>,
    armed: bool,
}

impl<T> Drop for ResolveGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.field.state.lock().unwrap();
            *state = LazyState::Unresolved;
            self.field.ready.notify_all();
        }
    }
}

impl<T: Clone> LazyField<T> {
    pub fn new<F>(resolver: F) -> Self
    where
        F: Fn() -> AfResult<T> + Send + Sync + 'static,
    {
        LazyField {
            state: Mutex::new(LazyState::Unresolved),
            ready: Condvar::new(),
            resolver: Box::new(resolver),
        }
    }

    /// Returns the resolved value, running the resolver on first access.
    ///
    /// Concurrent first accesses block until the single resolver run
    /// publishes its value; all of them observe that same value. A resolver
    /// error is returned to the caller and leaves the field unresolved.
    pub fn value(&self) -> AfResult<T> {
        {
            let mut state = self.state.lock().unwrap();
            loop {
                match &*state {
                    LazyState::Resolved(value) => return Ok(value.clone()),
                    LazyState::Resolving => {
                        state = self.ready.wait(state).unwrap();
                    }
                    LazyState::Unresolved => {
                        *state = LazyState::Resolving;
                        break;
                    }
                }
            }
        }

        // This thread won the race; run the resolver outside the lock so
        // waiters only block on the condvar, not on the remote call.
        let mut guard = ResolveGuard {
            field: self,
            armed: true,
        };
        let result = (self.resolver)();
        guard.armed = false;
        drop(guard);

        let mut state = self.state.lock().unwrap();
        match result {
            Ok(value) => {
                trace!("lazy field resolved");
                *state = LazyState::Resolved(value.clone());
                self.ready.notify_all();
                Ok(value)
            }
            Err(err) => {
                trace!("lazy field resolution failed: {}", err);
                *state = LazyState::Unresolved;
                self.ready.notify_all();
                Err(err)
            }
        }
    }

    /// True once a value has been published. Never blocks.
    pub fn is_resolved(&self) -> bool {
        matches!(&*self.state.lock().unwrap(), LazyState::Resolved(_))
    }
}

impl<T> std::fmt::Debug for LazyField<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.state.lock().unwrap() {
            LazyState::Unresolved => "Unresolved",
            LazyState::Resolving => "Resolving",
            LazyState::Resolved(_) => "Resolved",
        };
        f.debug_struct("LazyField").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AfError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn resolves_once_and_caches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let field = LazyField::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(42u32)
        });

        assert!(!field.is_resolved());
        assert_eq!(field.value().unwrap(), 42);
        assert_eq!(field.value().unwrap(), 42);
        assert!(field.is_resolved());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_first_access_runs_resolver_exactly_once() {
        const THREADS: usize = 16;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let field = Arc::new(LazyField::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            // Widen the race window.
            thread::sleep(std::time::Duration::from_millis(20));
            Ok("shared".to_string())
        }));

        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let field = Arc::clone(&field);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    field.value().unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "shared");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failure_is_not_sticky() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let field = LazyField::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AfError::Transport("connection refused".into()))
            } else {
                Ok(7u32)
            }
        });

        assert!(matches!(field.value(), Err(AfError::Transport(_))));
        assert!(!field.is_resolved());
        assert_eq!(field.value().unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_resolver_releases_waiters() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let field = Arc::new(LazyField::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("boom");
            }
            Ok(1u32)
        }));

        let loser = Arc::clone(&field);
        let first = thread::spawn(move || loser.value());
        assert!(first.join().is_err());

        // The field went back to Unresolved; a later access retries.
        assert_eq!(field.value().unwrap(), 1);
    }
}
