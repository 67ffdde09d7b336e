use serde::Deserialize;

use crate::identity::lenient_id;

/// 当前被判定的讨论主题（宿主内容模型提供）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DiscussionItem {
    #[serde(default, deserialize_with = "lenient_id")]
    pub category_id: Option<i64>,
    /// 主题发起人，用于区分楼主帖与非楼主帖。
    #[serde(default, rename = "user_id", deserialize_with = "lenient_id")]
    pub owner_id: Option<i64>,
}

impl DiscussionItem {
    pub fn in_category(category_id: i64) -> Self {
        Self {
            category_id: Some(category_id),
            owner_id: None,
        }
    }

    pub fn with_owner(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }
}
