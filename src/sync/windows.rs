/*!
 * CRITICAL_SECTION Mutex and CONDITION_VARIABLE
 *
 * Unlike pthread objects these have no static initializer, so each one is
 * initialized explicitly when constructed.
 */

use std::cell::UnsafeCell;
use std::ptr::NonNull;
use windows::Win32::System::Threading::{
    DeleteCriticalSection, EnterCriticalSection, InitializeConditionVariable,
    InitializeCriticalSection, LeaveCriticalSection, SleepConditionVariableCS,
    TryEnterCriticalSection, WakeAllConditionVariable, WakeConditionVariable, CONDITION_VARIABLE,
    CRITICAL_SECTION, INFINITE,
};

pub struct RawMutex {
    inner: NonNull<UnsafeCell<CRITICAL_SECTION>>,
}

// SAFETY: critical sections are shared between threads by design; the
// allocation keeps the address stable.
unsafe impl Send for RawMutex {}
unsafe impl Sync for RawMutex {}

impl RawMutex {
    pub fn new() -> Self {
        let inner = NonNull::from(Box::leak(Box::new(UnsafeCell::new(
            CRITICAL_SECTION::default(),
        ))));
        // SAFETY: the section is pinned in its allocation and not yet shared.
        unsafe { InitializeCriticalSection(inner.as_ref().get()) };
        Self { inner }
    }

    #[inline]
    pub(super) fn as_ptr(&self) -> *mut CRITICAL_SECTION {
        // SAFETY: `inner` stays allocated until drop.
        unsafe { self.inner.as_ref().get() }
    }

    /// Whether the calling thread entered the section more than once
    ///
    /// # Safety
    /// The calling thread must currently own the section.
    #[inline]
    unsafe fn is_recursive(&self) -> bool {
        (*self.as_ptr()).RecursionCount > 1
    }

    /// Critical sections recurse; a second entry by the owner is undone
    /// and rejected.
    ///
    /// # Safety
    /// The calling thread must not already hold the lock.
    #[inline]
    pub unsafe fn lock(&self) {
        EnterCriticalSection(self.as_ptr());
        if self.is_recursive() {
            LeaveCriticalSection(self.as_ptr());
            panic!("mutex relocked by the thread that holds it");
        }
    }

    /// Returns false without blocking if any thread, including the
    /// caller, holds the lock
    #[inline]
    pub fn try_lock(&self) -> bool {
        // SAFETY: the section is initialized and pinned; a recursive entry
        // is left again before reporting failure.
        unsafe {
            if !TryEnterCriticalSection(self.as_ptr()).as_bool() {
                return false;
            }
            if self.is_recursive() {
                LeaveCriticalSection(self.as_ptr());
                return false;
            }
        }
        true
    }

    /// # Safety
    /// The calling thread must hold the lock.
    #[inline]
    pub unsafe fn unlock(&self) {
        LeaveCriticalSection(self.as_ptr());
    }
}

impl Drop for RawMutex {
    fn drop(&mut self) {
        // Deleting an owned section is undefined; a guard leaked with
        // `mem::forget` leaves it owned, so leak the section too.
        if !self.try_lock() {
            return;
        }
        // SAFETY: entered by us just above and otherwise unreferenced.
        unsafe {
            LeaveCriticalSection(self.as_ptr());
            DeleteCriticalSection(self.as_ptr());
            drop(Box::from_raw(self.inner.as_ptr()));
        }
    }
}

pub struct RawCondvar {
    inner: Box<UnsafeCell<CONDITION_VARIABLE>>,
}

// SAFETY: see RawMutex.
unsafe impl Send for RawCondvar {}
unsafe impl Sync for RawCondvar {}

impl RawCondvar {
    pub fn new() -> Self {
        let inner = Box::new(UnsafeCell::new(CONDITION_VARIABLE::default()));
        // SAFETY: pinned and not yet shared.
        unsafe { InitializeConditionVariable(inner.get()) };
        Self { inner }
    }

    /// # Safety
    /// `mutex` must be locked by the calling thread.
    #[inline]
    pub unsafe fn wait(&self, mutex: &RawMutex) {
        let result = SleepConditionVariableCS(self.inner.get(), mutex.as_ptr(), INFINITE);
        debug_assert!(result.is_ok(), "SleepConditionVariableCS failed");
    }

    #[inline]
    pub fn signal(&self) {
        // SAFETY: initialized and pinned.
        unsafe { WakeConditionVariable(self.inner.get()) };
    }

    #[inline]
    pub fn broadcast(&self) {
        // SAFETY: initialized and pinned.
        unsafe { WakeAllConditionVariable(self.inner.get()) };
    }
}
