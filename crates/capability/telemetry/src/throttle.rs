//! 节流状态：消息键 -> 最近一次输出时间（毫秒）。
//!
//! 键来自固定的调用点集合，条目不做淘汰。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// 默认节流窗口（毫秒）。
pub const DEFAULT_THROTTLE_MS: u64 = 2000;

/// 节流表。读-改-写在同一把锁内完成。
#[derive(Debug, Default)]
pub struct ThrottleState {
    entries: Mutex<HashMap<String, u64>>,
}

static GLOBAL_THROTTLE: OnceLock<Arc<ThrottleState>> = OnceLock::new();

/// 由前缀与消息文本生成节流键。
pub fn throttle_key(prefix: &str, message: &str) -> String {
    format!("{prefix}::{message}")
}

impl ThrottleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级共享实例。
    pub fn global() -> Arc<ThrottleState> {
        GLOBAL_THROTTLE
            .get_or_init(|| Arc::new(ThrottleState::new()))
            .clone()
    }

    /// 窗口内已输出过则返回 false 且不更新；否则记录当前时间并返回 true。
    pub fn try_acquire(&self, key: &str, now_ms: u64, window_ms: u64) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(last_ms) = entries.get(key)
            && now_ms.saturating_sub(*last_ms) < window_ms
        {
            return false;
        }
        entries.insert(key.to_string(), now_ms);
        true
    }

    pub fn last_emitted_ms(&self, key: &str) -> Option<u64> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// 清空进程级节流表（测试或手动重置用）。
pub fn clear_throttle_state() {
    ThrottleState::global().clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppresses_within_window_without_touching_state() {
        let state = ThrottleState::new();
        assert!(state.try_acquire("a", 1_000, 2_000));
        assert!(!state.try_acquire("a", 2_999, 2_000));
        assert_eq!(state.last_emitted_ms("a"), Some(1_000));
        assert!(state.try_acquire("a", 3_000, 2_000));
        assert_eq!(state.last_emitted_ms("a"), Some(3_000));
    }

    #[test]
    fn keys_are_independent() {
        let state = ThrottleState::new();
        assert!(state.try_acquire(&throttle_key("[p]", "one"), 0, 2_000));
        assert!(state.try_acquire(&throttle_key("[p]", "two"), 1, 2_000));
        assert!(state.try_acquire(&throttle_key("[q]", "one"), 2, 2_000));
        assert_eq!(state.len(), 3);
        state.clear();
        assert!(state.is_empty());
    }
}
