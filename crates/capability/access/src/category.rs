//! 分类开关判定：切换按钮、回复按钮隐藏与帖子归类。
//!
//! 与分组访问控制相反，未配置分类时功能处于关闭状态。

use domain::DiscussionItem;
use owner_view_config::CategorySettings;
use std::collections::BTreeSet;

/// 分类判定结果及命中的规则。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDecision {
    FeatureDisabled,
    NoItem,
    NoCategoriesConfigured,
    CategoryEnabled,
    CategoryNotEnabled,
}

impl CategoryDecision {
    pub fn is_open(&self) -> bool {
        matches!(self, CategoryDecision::CategoryEnabled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryDecision::FeatureDisabled => "feature_disabled",
            CategoryDecision::NoItem => "no_item",
            CategoryDecision::NoCategoriesConfigured => "no_categories_configured",
            CategoryDecision::CategoryEnabled => "category_enabled",
            CategoryDecision::CategoryNotEnabled => "category_not_enabled",
        }
    }
}

fn decide(
    feature_enabled: bool,
    item: Option<&DiscussionItem>,
    enabled_category_ids: &BTreeSet<i64>,
) -> CategoryDecision {
    if !feature_enabled {
        return CategoryDecision::FeatureDisabled;
    }
    let Some(item) = item else {
        return CategoryDecision::NoItem;
    };
    if enabled_category_ids.is_empty() {
        return CategoryDecision::NoCategoriesConfigured;
    }
    match item.category_id {
        Some(category_id) if enabled_category_ids.contains(&category_id) => {
            CategoryDecision::CategoryEnabled
        }
        _ => CategoryDecision::CategoryNotEnabled,
    }
}

pub fn decide_category_gate(
    item: Option<&DiscussionItem>,
    settings: &CategorySettings,
) -> CategoryDecision {
    decide(
        settings.toggle_button_enabled,
        item,
        &settings.enabled_category_ids,
    )
}

/// 切换按钮是否在该主题的分类中显示。
pub fn evaluate_category_gate(item: Option<&DiscussionItem>, settings: &CategorySettings) -> bool {
    decide_category_gate(item, settings).is_open()
}

pub fn decide_reply_suppression(
    item: Option<&DiscussionItem>,
    settings: &CategorySettings,
) -> CategoryDecision {
    decide(
        settings.hide_reply_buttons_enabled,
        item,
        &settings.enabled_category_ids,
    )
}

/// 是否对该主题的非楼主帖隐藏回复按钮。
pub fn evaluate_reply_suppression(
    item: Option<&DiscussionItem>,
    settings: &CategorySettings,
) -> bool {
    decide_reply_suppression(item, settings).is_open()
}

/// 帖子归类结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostClass {
    Owner,
    NonOwner,
    /// 功能未在该主题生效，不做归类。
    Unclassified,
}

/// 按帖子作者与主题发起人是否一致归类。
pub fn classify_post(
    item: Option<&DiscussionItem>,
    author_id: Option<i64>,
    settings: &CategorySettings,
) -> PostClass {
    if !evaluate_reply_suppression(item, settings) {
        return PostClass::Unclassified;
    }
    let Some(owner_id) = item.and_then(|item| item.owner_id) else {
        return PostClass::Unclassified;
    };
    if author_id == Some(owner_id) {
        PostClass::Owner
    } else {
        PostClass::NonOwner
    }
}
