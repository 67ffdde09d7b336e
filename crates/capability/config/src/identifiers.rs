//! 竖线分隔的整数 ID 列表解析。

use domain::NumericId;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;

/// 将 `"1|2| 3"` 形式的设置解析为整数集合。
///
/// 每个片段先去除首尾空白再按十进制解析；空片段、非数字或越界的片段被静默丢弃。
/// 输入缺失或为空时返回空集合。
pub fn parse_identifier_list(raw: Option<&str>) -> BTreeSet<i64> {
    let Some(raw) = raw else {
        return BTreeSet::new();
    };
    raw.split('|')
        .filter_map(|token| token.trim().parse::<i64>().ok())
        .collect()
}

/// 集合的规范字符串形式（升序，竖线连接）。
pub fn format_identifier_list(ids: &BTreeSet<i64>) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join("|")
}

/// 分组规则（宿主 objects 类型设置的一项）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroupRule {
    /// 缺失、为 null 或形态不对时视为空；单个无效成员只丢弃该成员。
    #[serde(default, deserialize_with = "lenient_ids")]
    pub groups: Vec<NumericId>,
}

/// 列表形态设置中的一项：裸 ID 或分组规则。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IdentifierEntry {
    Id(NumericId),
    Rule(GroupRule),
}

/// ID 列表设置：宿主可能给出竖线字符串，或由 ID / 分组规则组成的数组。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IdentifierSetting {
    Piped(String),
    List(#[serde(deserialize_with = "lenient_entries")] Vec<IdentifierEntry>),
}

impl Default for IdentifierSetting {
    fn default() -> Self {
        IdentifierSetting::Piped(String::new())
    }
}

impl From<&str> for IdentifierSetting {
    fn from(value: &str) -> Self {
        IdentifierSetting::Piped(value.to_string())
    }
}

impl IdentifierSetting {
    /// 归一化为整数集合，无效项被丢弃。
    pub fn to_set(&self) -> BTreeSet<i64> {
        match self {
            IdentifierSetting::Piped(raw) => parse_identifier_list(Some(raw.as_str())),
            IdentifierSetting::List(entries) => entries
                .iter()
                .flat_map(|entry| match entry {
                    IdentifierEntry::Id(id) => std::slice::from_ref(id).iter(),
                    IdentifierEntry::Rule(rule) => rule.groups.iter(),
                })
                .filter_map(NumericId::to_i64)
                .collect(),
        }
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

/// 数组逐项解码，无法识别的项被丢弃；非数组按空处理。
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Lenient::<Vec<Lenient<T>>>::deserialize(deserializer)?;
    Ok(value
        .into_option()
        .unwrap_or_default()
        .into_iter()
        .filter_map(Lenient::into_option)
        .collect())
}

fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<NumericId>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_vec(deserializer)
}

fn lenient_entries<'de, D>(deserializer: D) -> Result<Vec<IdentifierEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<Lenient<IdentifierEntry>>::deserialize(deserializer)?;
    Ok(entries.into_iter().filter_map(Lenient::into_option).collect())
}

/// 任何无法识别的形态都按空列表处理，不报错。
pub(crate) fn lenient_identifier_setting<'de, D>(
    deserializer: D,
) -> Result<IdentifierSetting, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Lenient::<IdentifierSetting>::deserialize(deserializer)?;
    Ok(value.into_option().unwrap_or_default())
}
