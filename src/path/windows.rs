/*!
 * Windows Path Conventions
 *
 * Both `\` and `/` separate directories. When a path mixes them the scans
 * report the later of the candidate positions.
 */

use super::traits::PathConventions;

/// `\` separated paths (with `/` accepted), `;` separated lists
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsPaths;

impl PathConventions for WindowsPaths {
    const OS_PATH_SEPARATOR: char = '\\';
    const OS_PATH_SEPARATOR_STR: &'static str = "\\";
    const ENV_PATH_SEPARATOR: char = ';';
    const ENV_PATH_SEPARATOR_STR: &'static str = ";";

    fn dirstart(path: &str) -> Option<usize> {
        let bytes = path.as_bytes();
        let slash = bytes.iter().position(|&b| b == b'/');
        let backslash = bytes.iter().position(|&b| b == b'\\');
        // Later of the two first occurrences; `None` orders below `Some`.
        slash.max(backslash)
    }

    fn dirstop(path: &str) -> Option<usize> {
        path.as_bytes()
            .iter()
            .rposition(|&b| b == b'/' || b == b'\\')
    }

    fn is_absolute_host_path(path: &str) -> bool {
        matches!(path.as_bytes(), [drive, b':', b'\\', ..] if drive.is_ascii_alphabetic())
    }
}
