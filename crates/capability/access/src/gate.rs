//! 楼主视图判定服务：每次调用读取最新设置并记录判定过程。

use crate::access::decide_access;
use crate::category::{PostClass, classify_post, decide_category_gate, decide_reply_suppression};
use crate::viewer::{ViewerResolver, ViewerSource};
use domain::DiscussionItem;
use owner_view_config::SharedSettings;
use owner_view_telemetry::Logger;
use serde_json::json;
use std::sync::Arc;

/// 判定日志前缀。
pub const LOG_PREFIX: &str = "[Owner View] [Access]";

/// 渲染层调用的判定入口。
pub struct OwnerViewGate {
    settings: SharedSettings,
    resolver: ViewerResolver,
    log: Logger,
}

impl OwnerViewGate {
    /// 使用设置中的 `debug_logging_enabled` 作为日志开关。
    pub fn new(settings: SharedSettings) -> Self {
        let log = Logger::new(LOG_PREFIX, Arc::new(settings.clone()));
        Self::with_logger(settings, log)
    }

    pub fn with_logger(settings: SharedSettings, log: Logger) -> Self {
        Self {
            settings,
            resolver: ViewerResolver::new(),
            log,
        }
    }

    pub fn with_resolver(mut self, resolver: ViewerResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// 当前访问者是否允许使用楼主视图。
    pub fn is_viewer_allowed(&self, source: ViewerSource<'_>) -> bool {
        let viewer = self.resolver.resolve(&source, &self.log);
        let settings = self.settings.access_settings();
        let decision = decide_access(viewer.as_ref(), &settings);
        self.log.debug_throttled(
            &format!("access decision: {}", decision.as_str()),
            json!({
                "allowed": decision.is_allowed(),
                "viewer_id": viewer.as_ref().and_then(|viewer| viewer.id),
                "allowed_groups": settings.allowed_group_ids,
                "anonymous_behavior": settings.anonymous_behavior.as_str(),
                "staff_override": settings.staff_override_enabled,
            }),
        );
        decision.is_allowed()
    }

    /// 切换按钮是否显示。
    pub fn should_show_toggle_button(&self, item: Option<&DiscussionItem>) -> bool {
        let settings = self.settings.category_settings();
        let decision = decide_category_gate(item, &settings);
        self.log.debug_throttled(
            &format!("toggle button decision: {}", decision.as_str()),
            json!({
                "visible": decision.is_open(),
                "category_id": item.and_then(|item| item.category_id),
                "enabled_categories": settings.enabled_category_ids,
            }),
        );
        decision.is_open()
    }

    /// 是否隐藏非楼主帖的回复按钮。
    pub fn should_hide_reply_buttons(&self, item: Option<&DiscussionItem>) -> bool {
        let settings = self.settings.category_settings();
        let decision = decide_reply_suppression(item, &settings);
        self.log.debug_throttled(
            &format!("reply suppression decision: {}", decision.as_str()),
            json!({
                "hidden": decision.is_open(),
                "category_id": item.and_then(|item| item.category_id),
            }),
        );
        decision.is_open()
    }

    pub fn classify_post(&self, item: Option<&DiscussionItem>, author_id: Option<i64>) -> PostClass {
        classify_post(item, author_id, &self.settings.category_settings())
    }
}
