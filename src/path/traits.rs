/*!
 * Path Convention Traits
 */

use std::str::Split;

/// Separator conventions of one platform family
///
/// Indices returned by the scans are byte offsets into the input.
pub trait PathConventions {
    /// Directory separator
    const OS_PATH_SEPARATOR: char;
    const OS_PATH_SEPARATOR_STR: &'static str;

    /// Separator between entries of PATH-style environment values
    const ENV_PATH_SEPARATOR: char;
    const ENV_PATH_SEPARATOR_STR: &'static str;

    /// Byte index of the first directory separator
    fn dirstart(path: &str) -> Option<usize>;

    /// Byte index of the last directory separator
    fn dirstop(path: &str) -> Option<usize>;

    /// Whether `path` is absolute on this platform family
    fn is_absolute_host_path(path: &str) -> bool;

    /// Entries of a PATH-style value, empty entries included
    fn split_env_paths(value: &str) -> Split<'_, char> {
        value.split(Self::ENV_PATH_SEPARATOR)
    }
}
