//! Buffers core log lines so a host UI can drain them, and forwards each line to the `log` facade.

use once_cell::sync::Lazy;
use std::sync::Mutex;

pub use log::Level;

static RUST_LOG_BUFFER: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(Vec::new()));

const MAX_BUFFER_LEN: usize = 500;

fn should_buffer(level: log::Level, s: &str) -> bool {
    if level <= log::Level::Warn {
        return true;
    }
    // Keep fetch/cache/poll lines; per-record noise goes to the log facade only.
    let lower = s.to_lowercase();
    lower.contains("fetch") || lower.contains("cache") || lower.contains("poll")
}

/// Push a log line. Called by the rust_log! family of macros.
pub fn push(level: log::Level, s: String) {
    log::log!(target: "quakewatch_core", level, "{}", s);
    if !should_buffer(level, &s) {
        return;
    }
    if let Ok(mut v) = RUST_LOG_BUFFER.lock() {
        v.push(format!("[{}] {}", level, s));
        let n = v.len();
        if n > MAX_BUFFER_LEN {
            v.drain(0..n - MAX_BUFFER_LEN);
        }
    }
}

/// Drain and clear buffered log lines.
pub fn drain_rust_logs() -> Vec<String> {
    RUST_LOG_BUFFER
        .lock()
        .map(|mut v| std::mem::take(&mut *v))
        .unwrap_or_default()
}

#[macro_export]
macro_rules! rust_log {
    ($($t:tt)*) => {
        $crate::log_bridge::push($crate::log_bridge::Level::Info, format!($($t)*))
    };
}

#[macro_export]
macro_rules! rust_warn {
    ($($t:tt)*) => {
        $crate::log_bridge::push($crate::log_bridge::Level::Warn, format!($($t)*))
    };
}

#[macro_export]
macro_rules! rust_debug {
    ($($t:tt)*) => {
        $crate::log_bridge::push($crate::log_bridge::Level::Debug, format!($($t)*))
    };
}
