use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::app::state::{AppState, FocusedPane, Screen};
use crate::layout::Mode;
use crate::layout::nodes::{
    CHAT_PANE, DIVIDER_HANDLE, DIVIDER_WRAPPER, LayoutNodes, SEARCH_PANE, SPLIT_ROW,
};
use crate::ui::widgets;

/// Draw one frame and return the layout elements it mounted.
pub fn render(f: &mut Frame, state: &AppState) -> LayoutNodes {
    let mut mounted = LayoutNodes::new();

    // Main layout: body + status bar
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    let body_area = vertical[0];
    let status_area = vertical[1];

    if state.screen == Screen::Login {
        widgets::render_login(f, body_area, state);
    } else {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(body_area);
        widgets::render_nav(f, rows[0], state);

        match state.screen {
            Screen::Workspace => render_workspace(f, rows[1], state, &mut mounted),
            Screen::History => widgets::render_history(f, rows[1], state),
            Screen::Admin => widgets::render_admin(f, rows[1], state),
            Screen::Login => {}
        }
    }

    widgets::render_status_bar(f, status_area, state);

    // Overlays
    widgets::render_modal(f, f.area(), state);
    if state.error_message.is_some() {
        widgets::render_error_modal(f, f.area(), state);
    }

    mounted
}

fn render_workspace(f: &mut Frame, area: Rect, state: &AppState, mounted: &mut LayoutNodes) {
    match state.mode {
        Mode::Search => {
            mounted.mount(SEARCH_PANE, None, area);
            widgets::render_search_pane(f, area, state, true);
        }
        Mode::Chat => {
            mounted.mount(CHAT_PANE, None, area);
            widgets::render_chat_pane(f, area, state, true);
        }
        Mode::Split => {
            let [left, divider, right] = split_row(area, state.width.left_columns(area.width));

            mounted.mount(SPLIT_ROW, None, area);
            mounted.mount(SEARCH_PANE, Some(SPLIT_ROW), left);
            mounted.mount(DIVIDER_WRAPPER, Some(SPLIT_ROW), divider);
            mounted.mount(DIVIDER_HANDLE, Some(DIVIDER_WRAPPER), divider);
            mounted.mount(CHAT_PANE, Some(SPLIT_ROW), right);

            widgets::render_search_pane(f, left, state, state.focused_pane == FocusedPane::Search);
            widgets::render_divider(f, divider, state.drag.is_dragging());
            widgets::render_chat_pane(f, right, state, state.focused_pane == FocusedPane::Chat);
        }
    }
}

/// Left pane, one divider column, right pane.
fn split_row(area: Rect, left_cols: u16) -> [Rect; 3] {
    let left_cols = left_cols.min(area.width.saturating_sub(1));
    let left = Rect {
        width: left_cols,
        ..area
    };
    let divider = Rect {
        x: area.x + left_cols,
        width: 1.min(area.width),
        ..area
    };
    let right_x = divider.x + divider.width;
    let right = Rect {
        x: right_x,
        width: (area.x + area.width).saturating_sub(right_x),
        ..area
    };
    [left, divider, right]
}
