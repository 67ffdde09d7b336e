//! 日志输出端。

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// 日志级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// 单条日志，输出后即丢弃。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub prefix: String,
    pub message: String,
    /// 附加上下文，原样透传。
    pub context: Value,
}

/// 输出端收到的事件。
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    Record(LogRecord),
    GroupStart {
        prefix: String,
        label: String,
        collapsed: bool,
    },
    GroupEnd,
    /// 计时标签已带前缀。
    TimerStart {
        label: String,
    },
    TimerLog {
        label: String,
        context: Value,
    },
    TimerEnd {
        label: String,
    },
    Table {
        prefix: String,
        data: Value,
    },
}

/// 日志输出端（宿主控制台 / 遥测）。
pub trait LogSink: Send + Sync {
    fn write(&self, event: LogEvent);
}

/// 基于 tracing 的输出端，级别一一对应。
#[derive(Debug, Default)]
pub struct TracingSink {
    timers: Mutex<HashMap<String, Instant>>,
    depth: AtomicUsize,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn elapsed_ms(&self, label: &str, remove: bool) -> Option<u64> {
        let mut timers = self.timers.lock().unwrap_or_else(PoisonError::into_inner);
        let started = if remove {
            timers.remove(label)
        } else {
            timers.get(label).copied()
        };
        started.map(|started| started.elapsed().as_millis() as u64)
    }
}

impl LogSink for TracingSink {
    fn write(&self, event: LogEvent) {
        let depth = self.depth.load(Ordering::Relaxed);
        match event {
            LogEvent::Record(record) => {
                let LogRecord {
                    level,
                    prefix,
                    message,
                    context,
                } = record;
                match level {
                    LogLevel::Debug => {
                        tracing::debug!(prefix = %prefix, depth, context = %context, "{message}")
                    }
                    LogLevel::Info => {
                        tracing::info!(prefix = %prefix, depth, context = %context, "{message}")
                    }
                    LogLevel::Warn => {
                        tracing::warn!(prefix = %prefix, depth, context = %context, "{message}")
                    }
                    LogLevel::Error => {
                        tracing::error!(prefix = %prefix, depth, context = %context, "{message}")
                    }
                }
            }
            LogEvent::GroupStart {
                prefix,
                label,
                collapsed,
            } => {
                tracing::info!(prefix = %prefix, depth, collapsed, "group: {label}");
                self.depth.fetch_add(1, Ordering::Relaxed);
            }
            LogEvent::GroupEnd => {
                let _ = self
                    .depth
                    .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |d| d.checked_sub(1));
            }
            LogEvent::TimerStart { label } => {
                self.timers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(label, Instant::now());
            }
            LogEvent::TimerLog { label, context } => {
                if let Some(elapsed_ms) = self.elapsed_ms(&label, false) {
                    tracing::info!(depth, elapsed_ms, context = %context, "{label}");
                }
            }
            LogEvent::TimerEnd { label } => {
                if let Some(elapsed_ms) = self.elapsed_ms(&label, true) {
                    tracing::info!(depth, elapsed_ms, "{label}: timer ended");
                }
            }
            LogEvent::Table { prefix, data } => {
                tracing::info!(prefix = %prefix, depth, table = %data, "table");
            }
        }
    }
}

/// 内存输出端，记录所有事件。
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 仅返回分级日志。
    pub fn records(&self) -> Vec<LogRecord> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                LogEvent::Record(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemorySink {
    fn write(&self, event: LogEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
