//! 访问者身份（宿主身份/会话服务提供）。

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;

/// 上游传入的整数标识：可能是数字，也可能是字符串形式的整数。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NumericId {
    Numeric(i64),
    Text(String),
}

impl NumericId {
    /// 归一化为整数；无法解析时返回 None。
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            NumericId::Numeric(value) => Some(*value),
            NumericId::Text(value) => value.trim().parse::<i64>().ok(),
        }
    }
}

impl From<i64> for NumericId {
    fn from(value: i64) -> Self {
        NumericId::Numeric(value)
    }
}

impl From<&str> for NumericId {
    fn from(value: &str) -> Self {
        NumericId::Text(value.to_string())
    }
}

/// 当前访问者。匿名访问者以 `Option<ViewerIdentity>::None` 表示。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ViewerIdentity {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    /// 宿主字段名为 `staff`。
    #[serde(default, rename = "staff", deserialize_with = "lenient_bool")]
    pub is_privileged: bool,
    #[serde(default, rename = "groups", deserialize_with = "lenient_groups")]
    pub group_memberships: Vec<NumericId>,
}

impl ViewerIdentity {
    pub fn new(id: i64, is_privileged: bool, group_memberships: Vec<NumericId>) -> Self {
        Self {
            id: Some(id),
            is_privileged,
            group_memberships,
        }
    }

    /// 归一化后的分组 ID 集合，无法解析的成员被丢弃。
    pub fn group_ids(&self) -> BTreeSet<i64> {
        self.group_memberships
            .iter()
            .filter_map(NumericId::to_i64)
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

impl<T> Lenient<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Lenient::Value(value) => Some(value),
            Lenient::Other(_) => None,
        }
    }
}

/// 宿主分组既可能是 `{ "id": 5, "name": ".." }`，也可能是裸 ID。
#[derive(Deserialize)]
#[serde(untagged)]
enum GroupRef {
    Object { id: NumericId },
    Bare(NumericId),
}

impl From<GroupRef> for NumericId {
    fn from(value: GroupRef) -> Self {
        match value {
            GroupRef::Object { id } => id,
            GroupRef::Bare(id) => id,
        }
    }
}

pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Lenient::<NumericId>::deserialize(deserializer)?;
    Ok(value.into_option().and_then(|id| id.to_i64()))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Lenient::<bool>::deserialize(deserializer)?;
    Ok(value.into_option().unwrap_or(false))
}

fn lenient_groups<'de, D>(deserializer: D) -> Result<Vec<NumericId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Lenient::<Vec<Lenient<GroupRef>>>::deserialize(deserializer)?;
    Ok(value
        .into_option()
        .unwrap_or_default()
        .into_iter()
        .filter_map(Lenient::into_option)
        .map(NumericId::from)
        .collect())
}
