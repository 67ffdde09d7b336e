//! 带前缀的分级日志句柄。
//!
//! 除 `error` 外的所有操作只在调试开关打开时输出；开关在每次调用时重新读取。

use crate::DebugGate;
use crate::clock::{Clock, SystemClock};
use crate::sink::{LogEvent, LogLevel, LogRecord, LogSink, TracingSink};
use crate::throttle::{DEFAULT_THROTTLE_MS, ThrottleState, throttle_key};
use serde_json::Value;
use std::sync::{Arc, OnceLock};

static DEFAULT_SINK: OnceLock<Arc<TracingSink>> = OnceLock::new();

fn default_sink() -> Arc<dyn LogSink> {
    DEFAULT_SINK
        .get_or_init(|| Arc::new(TracingSink::new()))
        .clone()
}

/// 日志句柄，克隆后共享同一输出端与节流表。
#[derive(Clone)]
pub struct Logger {
    prefix: Arc<str>,
    gate: Arc<dyn DebugGate>,
    sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
    throttle: Arc<ThrottleState>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("prefix", &self.prefix)
            .field("debug_enabled", &self.gate.debug_enabled())
            .finish()
    }
}

impl Logger {
    /// 创建日志句柄：默认输出到 tracing，使用系统时间与进程级节流表。
    pub fn new(prefix: impl Into<String>, gate: Arc<dyn DebugGate>) -> Self {
        let prefix: String = prefix.into();
        Self {
            prefix: Arc::from(prefix),
            gate,
            sink: default_sink(),
            clock: Arc::new(SystemClock),
            throttle: ThrottleState::global(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_throttle(mut self, throttle: Arc<ThrottleState>) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn enabled(&self) -> bool {
        self.gate.debug_enabled()
    }

    fn record(&self, level: LogLevel, message: &str, context: Value) {
        self.sink.write(LogEvent::Record(LogRecord {
            level,
            prefix: self.prefix.to_string(),
            message: message.to_string(),
            context,
        }));
    }

    fn timer_label(&self, label: &str) -> String {
        format!("{} {}", self.prefix, label)
    }

    pub fn debug(&self, message: &str, context: Value) {
        if !self.enabled() {
            return;
        }
        self.record(LogLevel::Debug, message, context);
    }

    /// 同一前缀与消息在默认窗口内最多输出一次。
    pub fn debug_throttled(&self, message: &str, context: Value) {
        self.debug_throttled_with(message, DEFAULT_THROTTLE_MS, context);
    }

    /// 指定节流窗口（毫秒）。被抑制时不更新节流表。
    pub fn debug_throttled_with(&self, message: &str, window_ms: u64, context: Value) {
        if !self.enabled() {
            return;
        }
        let key = throttle_key(&self.prefix, message);
        if !self
            .throttle
            .try_acquire(&key, self.clock.now_ms(), window_ms)
        {
            return;
        }
        self.record(LogLevel::Debug, message, context);
    }

    pub fn info(&self, message: &str, context: Value) {
        if !self.enabled() {
            return;
        }
        self.record(LogLevel::Info, message, context);
    }

    pub fn warn(&self, message: &str, context: Value) {
        if !self.enabled() {
            return;
        }
        self.record(LogLevel::Warn, message, context);
    }

    /// 错误始终输出，不受调试开关影响。
    pub fn error(&self, message: &str, context: Value) {
        self.record(LogLevel::Error, message, context);
    }

    pub fn group(&self, label: &str) {
        self.start_group(label, false);
    }

    pub fn group_collapsed(&self, label: &str) {
        self.start_group(label, true);
    }

    fn start_group(&self, label: &str, collapsed: bool) {
        if !self.enabled() {
            return;
        }
        self.sink.write(LogEvent::GroupStart {
            prefix: self.prefix.to_string(),
            label: label.to_string(),
            collapsed,
        });
    }

    pub fn group_end(&self) {
        if !self.enabled() {
            return;
        }
        self.sink.write(LogEvent::GroupEnd);
    }

    pub fn time(&self, label: &str) {
        if !self.enabled() {
            return;
        }
        self.sink.write(LogEvent::TimerStart {
            label: self.timer_label(label),
        });
    }

    pub fn time_log(&self, label: &str, context: Value) {
        if !self.enabled() {
            return;
        }
        self.sink.write(LogEvent::TimerLog {
            label: self.timer_label(label),
            context,
        });
    }

    pub fn time_end(&self, label: &str) {
        if !self.enabled() {
            return;
        }
        self.sink.write(LogEvent::TimerEnd {
            label: self.timer_label(label),
        });
    }

    pub fn table(&self, data: Value) {
        if !self.enabled() {
            return;
        }
        self.sink.write(LogEvent::Table {
            prefix: self.prefix.to_string(),
            data,
        });
    }
}
