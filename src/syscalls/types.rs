/*!
 * Syscall Types
 * Platform-neutral open flags and creation modes
 */

use serde::{Deserialize, Serialize};

/// Mode used when a create-capable open is issued without an explicit mode
pub const DEFAULT_CREATE_MODE: u32 = 0o666;

/// File open flags
///
/// Converted to the native flag word by each platform backend. Numeric
/// POSIX flags can be brought in with [`OpenFlags::from_posix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct OpenFlags {
    pub read: bool,
    pub write: bool,
    pub append: bool,
    pub truncate: bool,
    pub create: bool,
    pub create_new: bool,
}

impl OpenFlags {
    #[inline]
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Default::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn write_only() -> Self {
        Self {
            write: true,
            ..Default::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn read_write() -> Self {
        Self {
            read: true,
            write: true,
            ..Default::default()
        }
    }

    /// Write + create + truncate, the flag set `creat` uses
    #[inline]
    #[must_use]
    pub fn create_truncate() -> Self {
        Self {
            write: true,
            create: true,
            truncate: true,
            ..Default::default()
        }
    }

    /// Write + exclusive create
    #[inline]
    #[must_use]
    pub fn create_new() -> Self {
        Self {
            write: true,
            create_new: true,
            ..Default::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn append_only() -> Self {
        Self {
            write: true,
            append: true,
            ..Default::default()
        }
    }

    /// Additionally request read access
    #[inline]
    #[must_use]
    pub const fn with_read(mut self) -> Self {
        self.read = true;
        self
    }

    #[inline]
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        self.write || self.append
    }

    /// Whether an open with these flags may create the file.
    ///
    /// The creation mode is only consulted when this returns true.
    #[inline]
    #[must_use]
    pub const fn will_create(&self) -> bool {
        self.create || self.create_new
    }

    /// Convert from Linux-numbered POSIX flags (O_RDONLY, O_WRONLY, O_RDWR, O_CREAT, ...)
    pub fn from_posix(flags: u32) -> Self {
        let access_mode = flags & 0o3;
        let read = access_mode == 0o0 || access_mode == 0o2;
        let write = access_mode == 0o1 || access_mode == 0o2;
        let create_new = flags & 0o200 != 0 && flags & 0o100 != 0;

        Self {
            read,
            write,
            append: flags & 0o2000 != 0,
            truncate: flags & 0o1000 != 0,
            create: flags & 0o100 != 0 && !create_new,
            create_new,
        }
    }
}
