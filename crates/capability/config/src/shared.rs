//! 运行期可替换的设置快照。

use crate::{AccessSettings, CategorySettings, ThemeSettings};
use owner_view_telemetry::DebugGate;
use std::sync::{Arc, PoisonError, RwLock};

/// 共享设置：宿主可在运行期替换，读取方每次调用都取最新值。
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<ThemeSettings>>,
}

impl SharedSettings {
    pub fn new(settings: ThemeSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// 当前设置的拷贝。
    pub fn snapshot(&self) -> ThemeSettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 整体替换设置。
    pub fn replace(&self, settings: ThemeSettings) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// 原地修改设置。
    pub fn update<F>(&self, apply: F)
    where
        F: FnOnce(&mut ThemeSettings),
    {
        apply(&mut self.inner.write().unwrap_or_else(PoisonError::into_inner));
    }

    pub fn access_settings(&self) -> AccessSettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .access_settings()
    }

    pub fn category_settings(&self) -> CategorySettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .category_settings()
    }
}

impl DebugGate for SharedSettings {
    fn debug_enabled(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .debug_logging_enabled
    }
}
