//! 主题设置读取与解析。

mod identifiers;
mod shared;

use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;
use std::env;
use std::str::FromStr;

pub use identifiers::{
    GroupRule, IdentifierEntry, IdentifierSetting, format_identifier_list, parse_identifier_list,
};
pub use shared::SharedSettings;

/// 环境变量前缀。
pub const ENV_PREFIX: &str = "OWNER_VIEW_";

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
    #[error("invalid settings payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// 匿名访问者的处理方式。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnonymousBehavior {
    Allow,
    #[default]
    Deny,
}

impl AnonymousBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnonymousBehavior::Allow => "allow",
            AnonymousBehavior::Deny => "deny",
        }
    }
}

impl FromStr for AnonymousBehavior {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(AnonymousBehavior::Allow),
            "deny" => Ok(AnonymousBehavior::Deny),
            _ => Err(ConfigError::Invalid(
                "behavior_for_anonymous".to_string(),
                value.to_string(),
            )),
        }
    }
}

/// 宿主主题设置（扁平映射，只读）。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    #[serde(deserialize_with = "identifiers::lenient_identifier_setting")]
    pub allowed_groups: IdentifierSetting,
    pub group_access_enabled: bool,
    pub include_staff: bool,
    #[serde(deserialize_with = "lenient_anonymous_behavior")]
    pub behavior_for_anonymous: AnonymousBehavior,
    #[serde(deserialize_with = "identifiers::lenient_identifier_setting")]
    pub owner_comment_categories: IdentifierSetting,
    pub toggle_view_button_enabled: bool,
    pub hide_reply_buttons_for_non_owners: bool,
    pub debug_logging_enabled: bool,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            allowed_groups: IdentifierSetting::default(),
            group_access_enabled: true,
            include_staff: false,
            behavior_for_anonymous: AnonymousBehavior::Deny,
            owner_comment_categories: IdentifierSetting::default(),
            toggle_view_button_enabled: false,
            hide_reply_buttons_for_non_owners: false,
            debug_logging_enabled: false,
        }
    }
}

/// 访问控制设置快照。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessSettings {
    /// 为空表示不限制。
    pub allowed_group_ids: BTreeSet<i64>,
    pub anonymous_behavior: AnonymousBehavior,
    pub staff_override_enabled: bool,
}

/// 分类开关设置快照。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySettings {
    /// 为空表示所有分类均不启用。
    pub enabled_category_ids: BTreeSet<i64>,
    pub toggle_button_enabled: bool,
    pub hide_reply_buttons_enabled: bool,
}

impl ThemeSettings {
    /// 从环境变量读取设置（`OWNER_VIEW_` 前缀）。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 通过任意键值来源读取设置，键名形如 `OWNER_VIEW_ALLOWED_GROUPS`。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let defaults = Self::default();

        let allowed_groups = read("ALLOWED_GROUPS")
            .map(IdentifierSetting::Piped)
            .unwrap_or_default();
        let owner_comment_categories = read("OWNER_COMMENT_CATEGORIES")
            .map(IdentifierSetting::Piped)
            .unwrap_or_default();
        let behavior_for_anonymous = read("BEHAVIOR_FOR_ANONYMOUS")
            .and_then(|value| value.parse::<AnonymousBehavior>().ok())
            .unwrap_or(defaults.behavior_for_anonymous);

        Ok(Self {
            allowed_groups,
            group_access_enabled: read_bool_with_default(
                read("GROUP_ACCESS_ENABLED"),
                defaults.group_access_enabled,
            ),
            include_staff: read_bool_with_default(read("INCLUDE_STAFF"), defaults.include_staff),
            behavior_for_anonymous,
            owner_comment_categories,
            toggle_view_button_enabled: read_bool_with_default(
                read("TOGGLE_VIEW_BUTTON_ENABLED"),
                defaults.toggle_view_button_enabled,
            ),
            hide_reply_buttons_for_non_owners: read_bool_with_default(
                read("HIDE_REPLY_BUTTONS_FOR_NON_OWNERS"),
                defaults.hide_reply_buttons_for_non_owners,
            ),
            debug_logging_enabled: read_bool_with_default(
                read("DEBUG_LOGGING_ENABLED"),
                defaults.debug_logging_enabled,
            ),
        })
    }

    /// 从宿主设置对象（JSON 文本）读取，缺失字段取默认值。
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// 解析访问控制设置。关闭分组访问控制时视为未配置分组。
    pub fn access_settings(&self) -> AccessSettings {
        let allowed_group_ids = if self.group_access_enabled {
            self.allowed_groups.to_set()
        } else {
            BTreeSet::new()
        };
        AccessSettings {
            allowed_group_ids,
            anonymous_behavior: self.behavior_for_anonymous,
            staff_override_enabled: self.include_staff,
        }
    }

    /// 解析分类开关设置。
    pub fn category_settings(&self) -> CategorySettings {
        CategorySettings {
            enabled_category_ids: self.owner_comment_categories.to_set(),
            toggle_button_enabled: self.toggle_view_button_enabled,
            hide_reply_buttons_enabled: self.hide_reply_buttons_for_non_owners,
        }
    }
}

/// 取值规则与 `FromStr` 一致；空值、未知值或非字符串按默认（deny）处理。
fn lenient_anonymous_behavior<'de, D>(deserializer: D) -> Result<AnonymousBehavior, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|value| value.parse::<AnonymousBehavior>().ok())
        .unwrap_or_default())
}

fn read_bool_with_default(value: Option<String>, default: bool) -> bool {
    match value {
        Some(value) => matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        None => default,
    }
}
