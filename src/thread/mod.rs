/*!
 * Thread Primitives
 *
 * Detached thread creation, thread ids for diagnostics, and millisecond
 * sleep. Threads spawned here can be neither joined nor cancelled; the
 * native handle is released as soon as creation succeeds.
 */

#[cfg(unix)]
mod posix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
use posix as platform;
#[cfg(windows)]
use windows as platform;

use crate::config::SysConfig;
use serde::{Deserialize, Serialize};
use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::time::Duration;
use tracing::{debug, error};

/// Portable thread start function taking one untyped argument
pub type ThreadFunc = extern "C" fn(*mut c_void) -> *mut c_void;

/// Options applied when spawning a thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadOptions {
    /// Stack size in bytes, platform default when `None`
    pub stack_size: Option<usize>,
}

impl ThreadOptions {
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub fn from_config(config: &SysConfig) -> Self {
        Self {
            stack_size: config.thread_stack_size,
        }
    }
}

/// Spawn a detached thread running `start(arg)`.
///
/// Returns false if the native thread-creation call failed, in which case
/// `start` is never called.
///
/// # Safety
/// `arg` must stay valid for as long as `start` uses it, and `start` must
/// not unwind.
pub unsafe fn thread_create_raw(start: ThreadFunc, arg: *mut c_void) -> bool {
    platform::spawn(start, arg, None)
}

type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

extern "C" fn run_boxed(arg: *mut c_void) -> *mut c_void {
    // SAFETY: `arg` came from `Box::into_raw` in `thread_create_with` and
    // is consumed exactly once, here.
    let task = unsafe { Box::from_raw(arg as *mut BoxedTask) };
    if panic::catch_unwind(AssertUnwindSafe(*task)).is_err() {
        error!(thread_id = thread_id(), "detached thread panicked");
    }
    ptr::null_mut()
}

/// Spawn a detached thread running `f` with default options
pub fn thread_create<F>(f: F) -> bool
where
    F: FnOnce() + Send + 'static,
{
    thread_create_with(&ThreadOptions::default(), f)
}

/// Spawn a detached thread running `f`.
///
/// On failure `f` is dropped without running.
pub fn thread_create_with<F>(options: &ThreadOptions, f: F) -> bool
where
    F: FnOnce() + Send + 'static,
{
    let task: BoxedTask = Box::new(f);
    let arg = Box::into_raw(Box::new(task)) as *mut c_void;

    // SAFETY: `arg` owns the boxed task until `run_boxed` reclaims it, and
    // `run_boxed` catches panics.
    let created = unsafe { platform::spawn(run_boxed, arg, options.stack_size) };
    if !created {
        debug!(stack_size = ?options.stack_size, "thread creation failed");
        // SAFETY: the thread never started, so the task is still ours.
        drop(unsafe { Box::from_raw(arg as *mut BoxedTask) });
    }
    created
}

/// Native id of the calling thread. For logging only.
#[inline]
pub fn thread_id() -> u64 {
    platform::current_id()
}

#[inline]
pub fn sleep_ms(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}
