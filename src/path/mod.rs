/*!
 * Path Module
 * Separator constants and directory-boundary scans
 *
 * Both conventions are always compiled so either can be used on any host;
 * [`HostPaths`] names the one matching the build target and the free
 * functions below forward to it.
 */

mod posix;
mod traits;
mod windows;

pub use posix::PosixPaths;
pub use traits::PathConventions;
pub use windows::WindowsPaths;

use std::str::Split;

#[cfg(unix)]
pub type HostPaths = PosixPaths;
#[cfg(windows)]
pub type HostPaths = WindowsPaths;

pub const OS_PATH_SEPARATOR: char = HostPaths::OS_PATH_SEPARATOR;
pub const OS_PATH_SEPARATOR_STR: &str = HostPaths::OS_PATH_SEPARATOR_STR;
pub const ENV_PATH_SEPARATOR: char = HostPaths::ENV_PATH_SEPARATOR;
pub const ENV_PATH_SEPARATOR_STR: &str = HostPaths::ENV_PATH_SEPARATOR_STR;

#[inline]
pub fn dirstart(path: &str) -> Option<usize> {
    HostPaths::dirstart(path)
}

#[inline]
pub fn dirstop(path: &str) -> Option<usize> {
    HostPaths::dirstop(path)
}

#[inline]
pub fn is_absolute_host_path(path: &str) -> bool {
    HostPaths::is_absolute_host_path(path)
}

#[inline]
pub fn split_env_paths(value: &str) -> Split<'_, char> {
    HostPaths::split_env_paths(value)
}
