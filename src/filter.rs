//! 过滤引擎
//!
//! 纯函数：给定原始数据、搜索词和所选家族，计算需要显示的子集。
//! 不修改输入，不持有状态，结果保持原始顺序。

use std::collections::HashSet;

use crate::models::Character;

/// 家族选择器中表示“不限家族”的哨兵值
pub const ALL_FAMILIES: &str = "All";

/// 用户输入的过滤条件
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub search_term: String,
    pub selected_family: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            selected_family: ALL_FAMILIES.to_string(),
        }
    }
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        self.search_term.is_empty() && self.selected_family == ALL_FAMILIES
    }
}

/// 计算匹配的下标（相对于 `raw`，升序）
///
/// - 搜索词为空时不做名字过滤；否则对 `full_name` 做大小写不敏感的子串匹配
/// - 家族为 `"All"` 时跳过家族过滤；否则要求 `family` 完全相等（区分大小写）
pub fn matching_indices(raw: &[Character], search_term: &str, selected_family: &str) -> Vec<usize> {
    let needle = search_term.to_lowercase();

    raw.iter()
        .enumerate()
        .filter(|(_, c)| needle.is_empty() || c.full_name.to_lowercase().contains(&needle))
        .filter(|(_, c)| selected_family == ALL_FAMILIES || c.family == selected_family)
        .map(|(i, _)| i)
        .collect()
}

/// 去重后的家族列表，按首次出现的顺序
pub fn family_catalog(raw: &[Character]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    raw.iter()
        .filter(|c| seen.insert(c.family.as_str()))
        .map(|c| c.family.clone())
        .collect()
}

/// 家族选择器的选项：`"All"` 在最前面
pub fn family_options(catalog: &[String]) -> Vec<String> {
    std::iter::once(ALL_FAMILIES.to_string())
        .chain(catalog.iter().cloned())
        .collect()
}
