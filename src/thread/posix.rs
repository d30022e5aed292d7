/*!
 * pthread Thread Creation
 */

use super::ThreadFunc;
use nix::libc;
use std::ffi::c_void;
use std::mem::MaybeUninit;

/// Spawn a detached pthread running `start(arg)`
///
/// # Safety
/// `arg` must remain valid for as long as `start` uses it.
pub unsafe fn spawn(start: ThreadFunc, arg: *mut c_void, stack_size: Option<usize>) -> bool {
    let mut attr = MaybeUninit::<libc::pthread_attr_t>::uninit();
    if libc::pthread_attr_init(attr.as_mut_ptr()) != 0 {
        return false;
    }

    let mut created = libc::pthread_attr_setdetachstate(
        attr.as_mut_ptr(),
        libc::PTHREAD_CREATE_DETACHED,
    ) == 0;

    if created {
        if let Some(size) = stack_size {
            created = libc::pthread_attr_setstacksize(attr.as_mut_ptr(), size) == 0;
        }
    }

    if created {
        let mut thread = MaybeUninit::<libc::pthread_t>::uninit();
        created = libc::pthread_create(thread.as_mut_ptr(), attr.as_ptr(), start, arg) == 0;
    }

    libc::pthread_attr_destroy(attr.as_mut_ptr());
    created
}

#[inline]
pub fn current_id() -> u64 {
    // SAFETY: pthread_self has no preconditions.
    unsafe { libc::pthread_self() as usize as u64 }
}
