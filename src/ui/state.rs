//! App 状态定义 (Model)
//!
//! ViewState 持有原始数据、过滤条件与派生的显示列表；
//! App 在其上叠加界面相关的状态（模式、选中项、家族选择光标）。

use chrono::{DateTime, Local};

use crate::error::AppError;
use crate::filter::{self, FilterState};
use crate::models::Character;

/// 数据与派生视图
#[derive(Debug, Clone)]
pub struct ViewState {
    raw: Vec<Character>,
    families: Vec<String>,
    filter: FilterState,
    display_list: Vec<usize>, // raw 中的下标
    loading: bool,
    loaded_at: Option<DateTime<Local>>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// 初始为加载中：无数据，显示列表为空
    pub fn new() -> Self {
        Self {
            raw: Vec::new(),
            families: Vec::new(),
            filter: FilterState::default(),
            display_list: Vec::new(),
            loading: true,
            loaded_at: None,
        }
    }

    /// 数据源返回后调用，只生效一次
    ///
    /// 失败时记录日志并按空数据处理，界面显示 "No Data Found"。
    pub fn finish_loading(&mut self, result: Result<Vec<Character>, AppError>) {
        if !self.loading {
            tracing::warn!("ignoring data source result after load completed");
            return;
        }

        self.raw = match result {
            Ok(characters) => characters,
            Err(e) => {
                tracing::error!("Error fetching data: {}", e);
                Vec::new()
            }
        };
        self.families = filter::family_catalog(&self.raw);
        self.loading = false;
        self.loaded_at = Some(Local::now());
        self.recompute();
    }

    /// 修改搜索词并重新计算
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
        self.recompute();
    }

    /// 修改所选家族并重新计算
    pub fn set_selected_family(&mut self, family: impl Into<String>) {
        self.filter.selected_family = family.into();
        self.recompute();
    }

    /// 恢复默认过滤条件
    pub fn reset_filter(&mut self) {
        self.filter = FilterState::default();
        self.recompute();
    }

    /// 从头计算显示列表，不做增量更新；加载完成前不计算
    fn recompute(&mut self) {
        if self.loading {
            return;
        }
        self.display_list = filter::matching_indices(
            &self.raw,
            &self.filter.search_term,
            &self.filter.selected_family,
        );
        tracing::debug!(
            search = %self.filter.search_term,
            family = %self.filter.selected_family,
            shown = self.display_list.len(),
            total = self.raw.len(),
            "recomputed display list"
        );
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn loaded_at(&self) -> Option<DateTime<Local>> {
        self.loaded_at
    }

    pub fn raw(&self) -> &[Character] {
        &self.raw
    }

    pub fn families(&self) -> &[String] {
        &self.families
    }

    /// 家族选择器选项，"All" 在前
    pub fn family_options(&self) -> Vec<String> {
        filter::family_options(&self.families)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn search_term(&self) -> &str {
        &self.filter.search_term
    }

    pub fn selected_family(&self) -> &str {
        &self.filter.selected_family
    }

    pub fn display_len(&self) -> usize {
        self.display_list.len()
    }

    /// 当前显示的角色，顺序与原始数据一致
    pub fn display(&self) -> impl Iterator<Item = &Character> {
        self.display_list.iter().map(|&i| &self.raw[i])
    }

    pub fn displayed(&self, index: usize) -> Option<&Character> {
        self.display_list.get(index).map(|&i| &self.raw[i])
    }
}

/// 应用状态
pub struct App {
    pub view: ViewState,
    pub mode: AppMode,
    pub selected_index: usize,
    pub family_cursor: usize,
    pub columns: usize,
    pub spinner_frame: usize,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Loading,
    Browse,
    Searching,
    SelectingFamily,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// 创建新的应用实例（加载中）
    pub fn new() -> Self {
        Self {
            view: ViewState::new(),
            mode: AppMode::Loading,
            selected_index: 0,
            family_cursor: 0,
            columns: 1,
            spinner_frame: 0,
        }
    }

    /// 刷新选中索引，确保在显示列表范围内
    pub fn clamp_selection(&mut self) {
        let len = self.view.display_len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    /// 获取当前选中的角色
    pub fn selected_character(&self) -> Option<&Character> {
        self.view.displayed(self.selected_index)
    }
}
