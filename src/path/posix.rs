/*!
 * POSIX Path Conventions
 */

use super::traits::PathConventions;

/// `/` separated paths, `:` separated lists
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixPaths;

impl PathConventions for PosixPaths {
    const OS_PATH_SEPARATOR: char = '/';
    const OS_PATH_SEPARATOR_STR: &'static str = "/";
    const ENV_PATH_SEPARATOR: char = ':';
    const ENV_PATH_SEPARATOR_STR: &'static str = ":";

    #[inline]
    fn dirstart(path: &str) -> Option<usize> {
        path.as_bytes().iter().position(|&b| b == b'/')
    }

    #[inline]
    fn dirstop(path: &str) -> Option<usize> {
        path.as_bytes().iter().rposition(|&b| b == b'/')
    }

    #[inline]
    fn is_absolute_host_path(path: &str) -> bool {
        path.starts_with('/')
    }
}
