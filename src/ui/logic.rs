//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑；所有过滤条件的修改都经由 ViewState 同步重算。

use super::actions::Action;
use super::state::{App, AppMode};
use crate::error::AppError;
use crate::models::Character;

/// 加载动画帧
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// 按终端宽度决定卡片列数（窄屏 1 列，中等 2 列，宽屏 4 列）
pub fn columns_for_width(width: u16) -> usize {
    match width {
        0..80 => 1,
        80..120 => 2,
        _ => 4,
    }
}

impl App {
    /// 核心逻辑分发
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,

            Action::MoveSelectionUp => match self.mode {
                AppMode::SelectingFamily => self.family_cursor_up(),
                _ => self.move_up(),
            },
            Action::MoveSelectionDown => match self.mode {
                AppMode::SelectingFamily => self.family_cursor_down(),
                _ => self.move_down(),
            },
            Action::MoveSelectionLeft => self.move_left(),
            Action::MoveSelectionRight => self.move_right(),

            Action::StartSearch => self.start_search(),
            Action::StartSelectFamily => self.start_select_family(),
            Action::ClearFilters => self.clear_filters(),

            Action::Cancel => self.cancel(),

            Action::Submit => match self.mode {
                AppMode::Searching => self.mode = AppMode::Browse,
                AppMode::SelectingFamily => self.confirm_family(),
                AppMode::Loading | AppMode::Browse => {}
            },

            Action::Input(c) => {
                if self.mode == AppMode::Searching {
                    let mut term = self.view.search_term().to_string();
                    term.push(c);
                    self.on_search_change(term);
                }
            }

            Action::DeleteChar => {
                if self.mode == AppMode::Searching {
                    let mut term = self.view.search_term().to_string();
                    if term.pop().is_some() {
                        self.on_search_change(term);
                    }
                }
            }
        }
        false
    }

    // ============ 加载相关 ============

    /// 数据源返回结果
    pub fn on_loaded(&mut self, result: Result<Vec<Character>, AppError>) {
        self.view.finish_loading(result);
        if self.mode == AppMode::Loading {
            self.mode = AppMode::Browse;
        }
        self.clamp_selection();
    }

    /// 推进加载动画
    pub fn tick(&mut self) {
        if self.view.is_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    /// 终端宽度变化时更新列数
    pub fn resize(&mut self, width: u16) {
        self.columns = columns_for_width(width);
    }

    // ============ 过滤相关 ============

    /// 搜索框内容变化
    pub fn on_search_change(&mut self, text: String) {
        self.view.set_search_term(text);
        self.clamp_selection();
    }

    /// 家族选择变化
    pub fn on_family_change(&mut self, value: String) {
        self.view.set_selected_family(value);
        self.clamp_selection();
    }

    /// 开始输入搜索词
    pub fn start_search(&mut self) {
        self.mode = AppMode::Searching;
    }

    /// 打开家族选择器，光标停在当前选中的家族上
    pub fn start_select_family(&mut self) {
        let current = self.view.selected_family();
        self.family_cursor = self
            .view
            .family_options()
            .iter()
            .position(|f| f == current)
            .unwrap_or(0);
        self.mode = AppMode::SelectingFamily;
    }

    fn family_cursor_up(&mut self) {
        if self.family_cursor > 0 {
            self.family_cursor -= 1;
        }
    }

    fn family_cursor_down(&mut self) {
        if self.family_cursor + 1 < self.view.family_options().len() {
            self.family_cursor += 1;
        }
    }

    /// 确认家族选择
    pub fn confirm_family(&mut self) {
        if let Some(family) = self.view.family_options().into_iter().nth(self.family_cursor) {
            self.on_family_change(family);
        }
        self.mode = AppMode::Browse;
    }

    /// 清空搜索词并恢复 "All"
    pub fn clear_filters(&mut self) {
        self.view.reset_filter();
        self.clamp_selection();
    }

    // ============ 导航相关 ============

    fn columns(&self) -> usize {
        self.columns.max(1)
    }

    /// 向上移动一行
    pub fn move_up(&mut self) {
        if self.selected_index >= self.columns() {
            self.selected_index -= self.columns();
        }
    }

    /// 向下移动一行
    pub fn move_down(&mut self) {
        if self.selected_index + self.columns() < self.view.display_len() {
            self.selected_index += self.columns();
        }
    }

    /// 向左移动（不跨行）
    pub fn move_left(&mut self) {
        if self.selected_index % self.columns() != 0 {
            self.selected_index -= 1;
        }
    }

    /// 向右移动（不跨行）
    pub fn move_right(&mut self) {
        let next = self.selected_index + 1;
        if next % self.columns() != 0 && next < self.view.display_len() {
            self.selected_index = next;
        }
    }

    // ============ 通用操作 ============

    /// 退出当前输入模式；搜索词保留
    pub fn cancel(&mut self) {
        match self.mode {
            AppMode::Searching | AppMode::SelectingFamily => self.mode = AppMode::Browse,
            AppMode::Loading | AppMode::Browse => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ALL_FAMILIES;
    use crate::models::CharacterId;
    use pretty_assertions::assert_eq;

    fn character(id: i64, name: &str, family: &str) -> Character {
        Character {
            id: CharacterId::Number(id),
            full_name: name.to_string(),
            family: family.to_string(),
            ..Default::default()
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new();
        app.on_loaded(Ok(vec![
            character(1, "Jon Snow", "Stark"),
            character(2, "Cersei Lannister", "Lannister"),
            character(3, "Arya Stark", "Stark"),
            character(4, "Jaime Lannister", "Lannister"),
            character(5, "Daenerys Targaryen", "Targaryen"),
        ]));
        app
    }

    fn shown(app: &App) -> Vec<String> {
        app.view.display().map(|c| c.full_name.clone()).collect()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dispatch(Action::Input(c));
        }
    }

    #[test]
    fn test_loaded_switches_to_browse() {
        let app = loaded_app();
        assert_eq!(app.mode, AppMode::Browse);
        assert_eq!(app.view.display_len(), 5);
    }

    #[test]
    fn test_failed_load_is_empty_not_error() {
        let mut app = App::new();
        app.on_loaded(Err(AppError::Status(503)));
        assert_eq!(app.mode, AppMode::Browse);
        assert!(!app.view.is_loading());
        assert_eq!(app.view.display_len(), 0);
        assert!(app.view.families().is_empty());
    }

    #[test]
    fn test_typing_filters_each_keystroke() {
        let mut app = loaded_app();
        app.dispatch(Action::StartSearch);
        assert_eq!(app.mode, AppMode::Searching);

        type_text(&mut app, "j");
        assert_eq!(shown(&app), vec!["Jon Snow", "Jaime Lannister"]);

        type_text(&mut app, "o");
        assert_eq!(shown(&app), vec!["Jon Snow"]);

        app.dispatch(Action::DeleteChar);
        assert_eq!(app.view.search_term(), "j");
        assert_eq!(shown(&app).len(), 2);

        app.dispatch(Action::Submit);
        assert_eq!(app.mode, AppMode::Browse);
        assert_eq!(app.view.search_term(), "j");
    }

    #[test]
    fn test_input_ignored_outside_search() {
        let mut app = loaded_app();
        app.dispatch(Action::Input('x'));
        assert_eq!(app.view.search_term(), "");
        assert_eq!(app.view.display_len(), 5);
    }

    #[test]
    fn test_select_family() {
        let mut app = loaded_app();
        app.dispatch(Action::StartSelectFamily);
        assert_eq!(app.mode, AppMode::SelectingFamily);
        assert_eq!(app.family_cursor, 0);

        app.dispatch(Action::MoveSelectionDown);
        app.dispatch(Action::MoveSelectionDown);
        app.dispatch(Action::Submit);

        assert_eq!(app.mode, AppMode::Browse);
        assert_eq!(app.view.selected_family(), "Lannister");
        assert_eq!(shown(&app), vec!["Cersei Lannister", "Jaime Lannister"]);

        // 再次打开时光标停在当前家族
        app.dispatch(Action::StartSelectFamily);
        assert_eq!(app.family_cursor, 2);
        app.dispatch(Action::Cancel);
        assert_eq!(app.view.selected_family(), "Lannister");
    }

    #[test]
    fn test_family_cursor_bounds() {
        let mut app = loaded_app();
        app.dispatch(Action::StartSelectFamily);
        app.dispatch(Action::MoveSelectionUp);
        assert_eq!(app.family_cursor, 0);
        for _ in 0..10 {
            app.dispatch(Action::MoveSelectionDown);
        }
        assert_eq!(app.family_cursor, 3);
    }

    #[test]
    fn test_search_and_family_combine() {
        let mut app = loaded_app();
        app.on_family_change("Stark".to_string());
        app.on_search_change("a".to_string());
        assert_eq!(shown(&app), vec!["Arya Stark"]);

        app.dispatch(Action::ClearFilters);
        assert_eq!(app.view.selected_family(), ALL_FAMILIES);
        assert_eq!(app.view.search_term(), "");
        assert_eq!(app.view.display_len(), 5);
    }

    #[test]
    fn test_selection_clamped_after_filter() {
        let mut app = loaded_app();
        app.selected_index = 4;
        app.on_family_change("Lannister".to_string());
        assert_eq!(app.selected_index, 1);
        assert_eq!(app.selected_character().unwrap().full_name, "Jaime Lannister");
    }

    #[test]
    fn test_grid_navigation() {
        let mut app = loaded_app();
        app.resize(100);
        assert_eq!(app.columns, 2);

        app.dispatch(Action::MoveSelectionRight);
        assert_eq!(app.selected_index, 1);
        app.dispatch(Action::MoveSelectionRight);
        assert_eq!(app.selected_index, 1);
        app.dispatch(Action::MoveSelectionDown);
        assert_eq!(app.selected_index, 3);
        app.dispatch(Action::MoveSelectionDown);
        assert_eq!(app.selected_index, 3);
        app.dispatch(Action::MoveSelectionLeft);
        assert_eq!(app.selected_index, 2);
        app.dispatch(Action::MoveSelectionDown);
        assert_eq!(app.selected_index, 4);
        app.dispatch(Action::MoveSelectionUp);
        app.dispatch(Action::MoveSelectionUp);
        app.dispatch(Action::MoveSelectionUp);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_columns_for_width() {
        assert_eq!(columns_for_width(40), 1);
        assert_eq!(columns_for_width(79), 1);
        assert_eq!(columns_for_width(80), 2);
        assert_eq!(columns_for_width(119), 2);
        assert_eq!(columns_for_width(120), 4);
    }

    #[test]
    fn test_spinner_only_while_loading() {
        let mut app = App::new();
        app.tick();
        app.tick();
        assert_eq!(app.spinner_frame, 2);
        assert_eq!(app.spinner(), SPINNER_FRAMES[2]);

        app.on_loaded(Ok(Vec::new()));
        app.tick();
        assert_eq!(app.spinner_frame, 2);
    }
}
