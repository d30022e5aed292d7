/*!
 * Synchronization Primitives
 *
 * Owned mutex and condition-variable objects backed directly by the native
 * primitive:
 * - POSIX: `pthread_mutex_t` / `pthread_cond_t` (static initializers)
 * - Windows: `CRITICAL_SECTION` / `CONDITION_VARIABLE` (explicit init)
 *
 * No timeout, fairness or queuing guarantees beyond the native primitive.
 * Re-locking a mutex from the thread that holds it never yields a second
 * guard: a pthread default mutex deadlocks (or panics where the platform
 * reports EDEADLK), a recursive critical-section entry is undone and
 * panics. `try_lock` from the holder returns `None` on both.
 *
 * A dropped mutex that is still locked (its guard was forgotten) is leaked
 * rather than destroyed. A condition variable binds to the first mutex it
 * waits with and panics if used with another.
 */

#[cfg(unix)]
mod posix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
use posix::{RawCondvar, RawMutex};
#[cfg(windows)]
use windows::{RawCondvar, RawMutex};

use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mutual exclusion around a value of type `T`
pub struct Mutex<T: ?Sized> {
    raw: RawMutex,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is serialized by `raw`.
unsafe impl<T: ?Sized + Send> Send for Mutex<T> {}
unsafe impl<T: ?Sized + Send> Sync for Mutex<T> {}

impl<T> Mutex<T> {
    pub fn new(value: T) -> Self {
        Self {
            raw: RawMutex::new(),
            data: UnsafeCell::new(value),
        }
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> Mutex<T> {
    /// Block until the lock is acquired
    pub fn lock(&self) -> MutexGuard<'_, T> {
        // SAFETY: the raw lock never returns to a thread that already holds
        // it; relocking deadlocks or panics.
        unsafe { self.raw.lock() };
        MutexGuard {
            mutex: self,
            _not_send: PhantomData,
        }
    }

    /// Acquire the lock only if it is free
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        if self.raw.try_lock() {
            Some(MutexGuard {
                mutex: self,
                _not_send: PhantomData,
            })
        } else {
            None
        }
    }

    /// Access the value through a unique borrow, no locking needed
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }
}

impl<T: Default> Default for Mutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: ?Sized> fmt::Debug for Mutex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutex").finish_non_exhaustive()
    }
}

/// Held lock; unlocks on drop
///
/// Not `Send`: the native unlock must run on the locking thread.
pub struct MutexGuard<'a, T: ?Sized> {
    mutex: &'a Mutex<T>,
    _not_send: PhantomData<*const ()>,
}

// SAFETY: sharing `&MutexGuard` only exposes `&T`.
unsafe impl<T: ?Sized + Sync> Sync for MutexGuard<'_, T> {}

impl<T: ?Sized> Deref for MutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the lock is held for the guard's lifetime.
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T: ?Sized> DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the lock is held and the guard is borrowed uniquely.
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<T: ?Sized> Drop for MutexGuard<'_, T> {
    fn drop(&mut self) {
        // SAFETY: this guard's thread holds the lock.
        unsafe { self.mutex.raw.unlock() };
    }
}

/// Condition variable used together with a [`Mutex`]
///
/// Wakeups may be spurious; use [`Condvar::wait_while`] or re-check the
/// predicate in a loop.
/// Waiting with two different mutexes on one condvar panics.
pub struct Condvar {
    raw: RawCondvar,
    /// Address of the native mutex this condvar is bound to, 0 if none yet
    mutex: AtomicUsize,
}

impl Condvar {
    pub fn new() -> Self {
        Self {
            raw: RawCondvar::new(),
            mutex: AtomicUsize::new(0),
        }
    }

    /// Bind to `raw` on first use, panic on any other mutex afterwards.
    /// The native object is heap-pinned, so its address is stable.
    fn verify(&self, raw: &RawMutex) {
        let addr = raw.as_ptr() as usize;
        match self
            .mutex
            .compare_exchange(0, addr, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => {}
            Err(bound) if bound == addr => {}
            Err(_) => panic!("attempted to use a condition variable with two mutexes"),
        }
    }

    /// Atomically release the guard's mutex and block until signalled.
    /// The mutex is re-acquired before returning.
    pub fn wait<T: ?Sized>(&self, guard: &mut MutexGuard<'_, T>) {
        self.verify(&guard.mutex.raw);
        // SAFETY: the guard proves the calling thread holds the mutex, and
        // every waiter uses that same mutex.
        unsafe { self.raw.wait(&guard.mutex.raw) };
    }

    /// Wait until `condition` returns false
    pub fn wait_while<T: ?Sized, F>(&self, guard: &mut MutexGuard<'_, T>, mut condition: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        self.verify(&guard.mutex.raw);
        while condition(&mut **guard) {
            self.wait(guard);
        }
    }

    /// Wake one waiter, if any
    #[inline]
    pub fn signal(&self) {
        self.raw.signal();
    }

    /// Wake every waiter
    #[inline]
    pub fn broadcast(&self) {
        self.raw.broadcast();
    }
}

impl Default for Condvar {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Condvar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condvar").finish_non_exhaustive()
    }
}
