//! 分组访问控制判定。

use domain::ViewerIdentity;
use owner_view_config::AccessSettings;

/// 访问判定结果及命中的规则。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// 未配置分组，不限制。
    Unrestricted,
    AnonymousDenied,
    StaffOverride,
    GroupMatch,
    NoGroupMatch,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(
            self,
            AccessDecision::Unrestricted | AccessDecision::StaffOverride | AccessDecision::GroupMatch
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessDecision::Unrestricted => "unrestricted",
            AccessDecision::AnonymousDenied => "anonymous_denied",
            AccessDecision::StaffOverride => "staff_override",
            AccessDecision::GroupMatch => "group_match",
            AccessDecision::NoGroupMatch => "no_group_match",
        }
    }
}

/// 按顺序匹配规则，首条命中即返回。
pub fn decide_access(viewer: Option<&ViewerIdentity>, settings: &AccessSettings) -> AccessDecision {
    if settings.allowed_group_ids.is_empty() {
        return AccessDecision::Unrestricted;
    }
    let Some(viewer) = viewer else {
        return AccessDecision::AnonymousDenied;
    };
    if settings.staff_override_enabled && viewer.is_privileged {
        return AccessDecision::StaffOverride;
    }
    let matched = viewer
        .group_ids()
        .iter()
        .any(|id| settings.allowed_group_ids.contains(id));
    if matched {
        AccessDecision::GroupMatch
    } else {
        AccessDecision::NoGroupMatch
    }
}

/// 当前访问者是否允许使用楼主视图。
pub fn evaluate_access(viewer: Option<&ViewerIdentity>, settings: &AccessSettings) -> bool {
    decide_access(viewer, settings).is_allowed()
}
