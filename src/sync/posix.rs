/*!
 * pthread Mutex and Condition Variable
 */

use nix::libc;
use std::cell::UnsafeCell;
use std::ptr::NonNull;

/// Heap-pinned `pthread_mutex_t`, statically initialized
pub struct RawMutex {
    inner: NonNull<UnsafeCell<libc::pthread_mutex_t>>,
}

// SAFETY: pthread mutexes are designed to be shared between threads; the
// allocation keeps the address stable.
unsafe impl Send for RawMutex {}
unsafe impl Sync for RawMutex {}

impl RawMutex {
    pub fn new() -> Self {
        let boxed = Box::new(UnsafeCell::new(libc::PTHREAD_MUTEX_INITIALIZER));
        Self {
            inner: NonNull::from(Box::leak(boxed)),
        }
    }

    #[inline]
    pub(super) fn as_ptr(&self) -> *mut libc::pthread_mutex_t {
        // SAFETY: `inner` stays allocated until drop.
        unsafe { self.inner.as_ref().get() }
    }

    /// # Safety
    /// The calling thread must not already hold the lock.
    #[inline]
    pub unsafe fn lock(&self) {
        let rc = libc::pthread_mutex_lock(self.as_ptr());
        assert_eq!(rc, 0, "pthread_mutex_lock failed");
    }

    /// Returns false without blocking if the lock is held
    #[inline]
    pub fn try_lock(&self) -> bool {
        // SAFETY: the mutex is initialized and pinned.
        unsafe { libc::pthread_mutex_trylock(self.as_ptr()) == 0 }
    }

    /// # Safety
    /// The calling thread must hold the lock.
    #[inline]
    pub unsafe fn unlock(&self) {
        let rc = libc::pthread_mutex_unlock(self.as_ptr());
        debug_assert_eq!(rc, 0, "pthread_mutex_unlock failed");
    }
}

impl Drop for RawMutex {
    fn drop(&mut self) {
        // A guard leaked with `mem::forget` leaves the mutex locked, and
        // destroying a locked mutex is undefined. Leak it instead.
        if !self.try_lock() {
            return;
        }
        // SAFETY: locked by us just above and otherwise unreferenced.
        unsafe {
            libc::pthread_mutex_unlock(self.as_ptr());
            libc::pthread_mutex_destroy(self.as_ptr());
            drop(Box::from_raw(self.inner.as_ptr()));
        }
    }
}

/// Heap-pinned `pthread_cond_t`, statically initialized
pub struct RawCondvar {
    inner: Box<UnsafeCell<libc::pthread_cond_t>>,
}

// SAFETY: see RawMutex.
unsafe impl Send for RawCondvar {}
unsafe impl Sync for RawCondvar {}

impl RawCondvar {
    pub fn new() -> Self {
        Self {
            inner: Box::new(UnsafeCell::new(libc::PTHREAD_COND_INITIALIZER)),
        }
    }

    /// # Safety
    /// `mutex` must be locked by the calling thread.
    #[inline]
    pub unsafe fn wait(&self, mutex: &RawMutex) {
        let rc = libc::pthread_cond_wait(self.inner.get(), mutex.as_ptr());
        debug_assert_eq!(rc, 0, "pthread_cond_wait failed");
    }

    #[inline]
    pub fn signal(&self) {
        // SAFETY: the condvar is initialized and pinned.
        unsafe {
            libc::pthread_cond_signal(self.inner.get());
        }
    }

    #[inline]
    pub fn broadcast(&self) {
        // SAFETY: the condvar is initialized and pinned.
        unsafe {
            libc::pthread_cond_broadcast(self.inner.get());
        }
    }
}

impl Drop for RawCondvar {
    fn drop(&mut self) {
        // SAFETY: `&mut self` proves no thread is waiting.
        unsafe {
            libc::pthread_cond_destroy(self.inner.get());
        }
    }
}
