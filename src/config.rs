/*!
 * Configuration
 *
 * Ambient defaults for the primitives, read from the environment:
 * - HOSTSYS_THREAD_STACK_SIZE: stack size in bytes for spawned threads
 * - HOSTSYS_RCVBUF: receive buffer size applied by `SocketTuning`
 * - HOSTSYS_TCP_NODELAY: disable Nagle in `SocketTuning` (default: true)
 * - HOSTSYS_TRACE_JSON: JSON log output (default: false)
 */

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const ENV_THREAD_STACK_SIZE: &str = "HOSTSYS_THREAD_STACK_SIZE";
pub const ENV_RCVBUF: &str = "HOSTSYS_RCVBUF";
pub const ENV_TCP_NODELAY: &str = "HOSTSYS_TCP_NODELAY";
pub const ENV_TRACE_JSON: &str = "HOSTSYS_TRACE_JSON";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Process-wide defaults for the primitives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SysConfig {
    pub thread_stack_size: Option<usize>,
    pub recv_buffer_size: Option<i32>,
    pub tcp_nodelay: bool,
    pub trace_json: bool,
}

impl Default for SysConfig {
    fn default() -> Self {
        Self {
            thread_stack_size: None,
            recv_buffer_size: None,
            tcp_nodelay: true,
            trace_json: false,
        }
    }
}

impl SysConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_THREAD_STACK_SIZE) {
            config.thread_stack_size = Some(parse_size(ENV_THREAD_STACK_SIZE, &value)?);
        }
        if let Some(value) = lookup(ENV_RCVBUF) {
            config.recv_buffer_size = Some(parse_size(ENV_RCVBUF, &value)?);
        }
        if let Some(value) = lookup(ENV_TCP_NODELAY) {
            config.tcp_nodelay = parse_bool(ENV_TCP_NODELAY, &value)?;
        }
        if let Some(value) = lookup(ENV_TRACE_JSON) {
            config.trace_json = parse_bool(ENV_TRACE_JSON, &value)?;
        }

        Ok(config)
    }
}

fn parse_size<T>(var: &'static str, value: &str) -> ConfigResult<T>
where
    T: FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(n) if n <= T::default() => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: "must be greater than zero",
        }),
        Ok(n) => Ok(n),
        Err(_) => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: "expected a byte count",
        }),
    }
}

fn parse_bool(var: &'static str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: "expected a boolean",
        }),
    }
}
