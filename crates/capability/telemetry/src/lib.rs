//! 诊断日志：前缀、开关门控、节流、分组与计时标记。

mod clock;
mod logger;
mod sink;
mod throttle;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

pub use clock::{Clock, ManualClock, SystemClock};
pub use logger::Logger;
pub use sink::{LogEvent, LogLevel, LogRecord, LogSink, MemorySink, TracingSink};
pub use throttle::{DEFAULT_THROTTLE_MS, ThrottleState, clear_throttle_state, throttle_key};

/// 调试日志开关。每次日志调用都会重新读取，不做缓存。
pub trait DebugGate: Send + Sync {
    fn debug_enabled(&self) -> bool;
}

/// 可在运行期切换的调试开关。
#[derive(Debug, Default)]
pub struct DebugFlag {
    enabled: AtomicBool,
}

impl DebugFlag {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}

impl DebugGate for DebugFlag {
    fn debug_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

/// 创建带前缀的日志句柄，调试开关由调用方注入。
pub fn create_logger(prefix: impl Into<String>, gate: Arc<dyn DebugGate>) -> Logger {
    Logger::new(prefix, gate)
}

/// 未设置 `RUST_LOG` 时的过滤规则：其它 target 为 info，本 crate 的输出端放开到 debug，
/// 这样调试开关打开后 `debug` 记录无需额外配置即可显示。
pub const DEFAULT_LOG_FILTER: &str = "info,owner_view_telemetry=debug";

/// 初始化 tracing。设置了 `RUST_LOG` 时以其为准。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = fmt().with_env_filter(filter).try_init();
}
