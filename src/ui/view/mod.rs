//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
};

use super::state::{App, AppMode};
use components::{CARD_HEIGHT, render_character_card, render_dialog_framework, render_input_widget};
use layouts::{centered_rect, grid_columns};

const HEADING: &str = "Game of Thrones Characters";

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    app.resize(area.width);

    if app.view.is_loading() {
        render_loading(frame, app, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Length(3), // 搜索 + 家族
            Constraint::Min(CARD_HEIGHT), // 卡片
            Constraint::Length(3), // 帮助
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_filters(frame, app, chunks[1]);
    render_grid(frame, app, chunks[2]);
    render_help(frame, app, chunks[3]);

    if app.mode == AppMode::SelectingFamily {
        render_family_dialog(frame, app);
    }
}

fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);

    let spinner = Paragraph::new(app.spinner())
        .style(Style::default().fg(Color::Blue))
        .alignment(Alignment::Center);
    frame.render_widget(spinner, chunks[1]);

    let text = Paragraph::new("Loading...")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(text, chunks[2]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        HEADING,
        Style::default()
            .fg(Color::Rgb(0xd9, 0x48, 0x0f))
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(loaded_at) = app.view.loaded_at() {
        let summary = if app.view.filter().is_default() {
            format!(
                "  {} characters · {} families · {}",
                app.view.raw().len(),
                app.view.families().len(),
                loaded_at.format("%H:%M")
            )
        } else {
            format!(
                "  {}/{} shown · {}",
                app.view.display_len(),
                app.view.raw().len(),
                loaded_at.format("%H:%M")
            )
        };
        spans.push(Span::styled(summary, Style::default().fg(Color::Gray)));
    }

    let title = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_filters(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_input_widget(
        frame,
        chunks[0],
        "Search",
        app.view.search_term(),
        "Search...",
        app.mode == AppMode::Searching,
    );

    let family_style = if app.mode == AppMode::SelectingFamily {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let family = Paragraph::new(format!("{} ▾", app.view.selected_family())).block(
        Block::default()
            .title("Family")
            .borders(Borders::ALL)
            .border_style(family_style),
    );
    frame.render_widget(family, chunks[1]);
}

/// 第一行可见卡片所在的行号，保证选中行在可见范围内
fn first_visible_row(selected_row: usize, visible_rows: usize) -> usize {
    if visible_rows == 0 || selected_row < visible_rows {
        0
    } else {
        selected_row + 1 - visible_rows
    }
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    if app.view.display_len() == 0 {
        let empty = Paragraph::new("No Data Found")
            .style(
                Style::default()
                    .fg(Color::Rgb(0xc9, 0x2a, 0x2a))
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().padding(Padding::top(1)));
        frame.render_widget(empty, area);
        return;
    }

    let columns = app.columns.max(1);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let first_row = first_visible_row(app.selected_index / columns, visible_rows);

    let characters: Vec<_> = app.view.display().collect();
    for (row_offset, row) in characters
        .chunks(columns)
        .skip(first_row)
        .take(visible_rows)
        .enumerate()
    {
        let y = area.y + row_offset as u16 * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
        if height == 0 {
            break;
        }
        let row_area = Rect::new(area.x, y, area.width, height);
        let cells = grid_columns(row_area, columns);

        for (col, character) in row.iter().enumerate() {
            let index = (first_row + row_offset) * columns + col;
            render_character_card(frame, cells[col], character, index == app.selected_index);
        }
    }
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.mode {
        AppMode::Loading => "[q] Quit",
        AppMode::Browse => {
            "[/] Search  [f] Family  [c] Clear filters  [h/j/k/l] Navigate  [q] Quit"
        }
        AppMode::Searching => "Type to filter  [Enter/Esc] Done  [Backspace] Delete",
        AppMode::SelectingFamily => "[j/k] Choose  [Enter] Apply  [Esc] Cancel",
    };

    let text = match (&app.mode, app.selected_character()) {
        (AppMode::Browse, Some(character)) => {
            format!("{}  |  {} · {}", help_text, character.full_name, character.family)
        }
        _ => help_text.to_string(),
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_family_dialog(frame: &mut Frame, app: &App) {
    let area = centered_rect(40, 60, frame.area());
    let inner = render_dialog_framework(frame, area, "Family");

    let current = app.view.selected_family();
    let items: Vec<ListItem> = app
        .view
        .family_options()
        .into_iter()
        .map(|family| {
            let marker = if family == current { "● " } else { "  " };
            ListItem::new(format!("{}{}", marker, family))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
    );

    let mut state = ListState::default();
    state.select(Some(app.family_cursor));

    frame.render_stateful_widget(list, inner, &mut state);
}
