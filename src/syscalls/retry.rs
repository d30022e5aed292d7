/*!
 * Interrupt Retry
 * Re-issue blocking calls that fail with EINTR
 */

use nix::errno::Errno;
use std::io;
use tracing::trace;

/// Call `f` until it no longer fails with `EINTR`.
///
/// The final result is whatever the first non-interrupted call returned.
pub(crate) fn retry_on_interrupt<F, T>(name: &'static str, mut f: F) -> io::Result<T>
where
    F: FnMut() -> nix::Result<T>,
{
    loop {
        match f() {
            Err(Errno::EINTR) => {
                trace!(syscall = name, "interrupted, retrying");
                continue;
            }
            result => return result.map_err(io::Error::from),
        }
    }
}
