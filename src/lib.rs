/*!
 * Host System Primitives
 * One set of names for file, socket, thread and lock primitives on POSIX
 * and Windows hosts
 *
 * The build target picks the backend; callers never branch on platform.
 */

pub mod config;
pub mod external;
pub mod init;
pub mod net;
pub mod path;
pub mod sync;
pub mod syscalls;
pub mod thread;
pub mod tracer;

// Re-exports
pub use config::{ConfigError, SysConfig};
pub use init::{init, platform_name};
pub use net::{disable_nagle, set_recv_buffer_size, SocketTuning};
pub use path::{
    dirstart, dirstop, is_absolute_host_path, split_env_paths, PathConventions, PosixPaths,
    WindowsPaths, ENV_PATH_SEPARATOR, ENV_PATH_SEPARATOR_STR, OS_PATH_SEPARATOR,
    OS_PATH_SEPARATOR_STR,
};
pub use sync::{Condvar, Mutex, MutexGuard};
pub use syscalls::{FileDesc, FileRef, OpenFlags, SocketDesc, SocketRef};
pub use thread::{
    sleep_ms, thread_create, thread_create_raw, thread_create_with, thread_id, ThreadFunc,
    ThreadOptions,
};
pub use tracer::init_tracing;
