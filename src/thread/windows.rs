/*!
 * Win32 Thread Creation
 *
 * The native start routine has a different ABI, so the portable start
 * function and its argument travel through a boxed trampoline payload.
 */

use super::ThreadFunc;
use std::ffi::c_void;
use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::Threading::{
    CreateThread, GetCurrentThreadId, STACK_SIZE_PARAM_IS_A_RESERVATION, THREAD_CREATION_FLAGS,
};

struct StartPayload {
    start: ThreadFunc,
    arg: *mut c_void,
}

unsafe extern "system" fn trampoline(param: *mut c_void) -> u32 {
    let payload = Box::from_raw(param as *mut StartPayload);
    (payload.start)(payload.arg);
    0
}

/// Spawn a thread running `start(arg)` and drop its handle immediately
///
/// # Safety
/// `arg` must remain valid for as long as `start` uses it.
pub unsafe fn spawn(start: ThreadFunc, arg: *mut c_void, stack_size: Option<usize>) -> bool {
    let payload = Box::into_raw(Box::new(StartPayload { start, arg }));
    let flags = if stack_size.is_some() {
        STACK_SIZE_PARAM_IS_A_RESERVATION
    } else {
        THREAD_CREATION_FLAGS(0)
    };

    match CreateThread(
        None,
        stack_size.unwrap_or(0),
        Some(trampoline),
        Some(payload as *const c_void),
        flags,
        None,
    ) {
        Ok(handle) => {
            let _ = CloseHandle(handle);
            true
        }
        Err(_) => {
            drop(Box::from_raw(payload));
            false
        }
    }
}

#[inline]
pub fn current_id() -> u64 {
    // SAFETY: no preconditions.
    u64::from(unsafe { GetCurrentThreadId() })
}
