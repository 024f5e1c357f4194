use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use crate::api::models::{
    AdminRequest, HistoryScope, MessageKind, RequestStatus, Role, SearchField, UserStatus,
};
use crate::app::state::{AdminTab, AppState, ConfirmAction, Field, FocusedPane, LoginMode, Modal};
use crate::ui::theme;
use crate::util::time::{relative_time, short_timestamp};

fn border_for(focused: bool) -> Style {
    if focused {
        theme::BORDER_FOCUSED
    } else {
        theme::BORDER_UNFOCUSED
    }
}

fn cursor_style(selected: bool, fallback: Style) -> Style {
    if selected { theme::HIGHLIGHT } else { fallback }
}

/// One labelled input line. Masked fields show bullets.
fn input_line<'a>(label: &'a str, value: &str, active: bool, masked: bool) -> Line<'a> {
    let shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let caret = if active { "_" } else { "" };
    let style = if active {
        theme::INPUT_ACTIVE
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{:<18}", label), theme::DIM),
        Span::styled(format!("{}{}", shown, caret), style),
    ])
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2)).max(1);
    let height = height.min(area.height.saturating_sub(2)).max(1);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// A pick-one line; the chosen value sits between arrows while active.
fn picker_line<'a>(label: &'a str, value: Option<&str>, active: bool) -> Line<'a> {
    let shown = match (value, active) {
        (Some(v), true) => format!("< {} >", v),
        (Some(v), false) => v.to_string(),
        (None, true) => "< choose >".to_string(),
        (None, false) => "-".to_string(),
    };
    let style = if active {
        theme::INPUT_ACTIVE
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{:<18}", label), theme::DIM),
        Span::styled(shown, style),
    ])
}

pub fn render_login(f: &mut Frame, area: Rect, state: &AppState) {
    let login = &state.login;
    let editing = state.editing;
    let active = |field: Field| editing == Some(field);

    let (title, busy, hint) = match login.mode {
        LoginMode::SignIn => (
            " Veraclaim · Sign in ",
            "Signing in...",
            "Tab: next field | Enter: sign in | Ctrl+N: sign up | Ctrl+R: reset password",
        ),
        LoginMode::SignUp => (
            " Veraclaim · Sign up ",
            "Creating account...",
            "Tab: next field | ←/→: choose | Enter: sign up | Esc: back",
        ),
        LoginMode::Reset => (
            " Veraclaim · Password reset ",
            "Sending request...",
            "Tab: next field | ←/→: choose | Enter: send | Esc: back",
        ),
    };

    let mut lines = vec![
        Line::from(Span::styled("Patent search and analysis", theme::HEADER)),
        Line::from(""),
        input_line("Username", &login.username, active(Field::Username), false),
    ];
    match login.mode {
        LoginMode::SignIn => {
            lines.push(input_line("Password", &login.password, active(Field::Password), true));
        }
        LoginMode::SignUp => {
            lines.push(input_line("Email", &login.email, active(Field::Email), false));
            lines.push(input_line("Password", &login.password, active(Field::Password), true));
            lines.push(input_line(
                "Confirm",
                &login.confirm,
                active(Field::SignupConfirm),
                true,
            ));
            lines.push(input_line(
                "First name",
                &login.first_name,
                active(Field::FirstName),
                false,
            ));
            lines.push(input_line(
                "Last name",
                &login.last_name,
                active(Field::LastName),
                false,
            ));
        }
        LoginMode::Reset => {
            lines.push(input_line("Email", &login.email, active(Field::Email), false));
        }
    }
    if login.mode != LoginMode::SignIn {
        if login.directory_loaded {
            lines.push(picker_line("Company", login.company_name(), active(Field::Company)));
            lines.push(picker_line(
                "Department",
                login.department_name(),
                active(Field::Department),
            ));
        } else {
            lines.push(Line::from(Span::styled("Loading companies...", theme::DIM)));
        }
    }
    lines.push(Line::from(""));
    lines.push(if login.submitting {
        Line::from(Span::styled(busy, theme::WARNING))
    } else {
        Line::from("")
    });
    lines.push(Line::from(Span::styled(hint, theme::DIM)));

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme::BORDER_FOCUSED);
    let modal = centered_rect(area, 78, lines.len() as u16 + 2);
    f.render_widget(Clear, modal);
    f.render_widget(Paragraph::new(lines).block(block), modal);
}

pub fn render_search_pane(f: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let search = &state.search;
    let title = if search.total_count > 0 {
        format!(
            " Patent search ({} results, page {}/{}) ",
            search.total_count,
            search.current_page,
            search.total_pages.max(1)
        )
    } else {
        " Patent search ".to_string()
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_for(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let editing = state.editing == Some(Field::Query);
    f.render_widget(
        Paragraph::new(input_line("Keyword", &search.query, editing, false)),
        rows[0],
    );

    let mut filters = vec![Span::styled("Fields: ", theme::DIM)];
    for field in SearchField::ALL {
        let on = search.fields.contains(&field);
        let mark = if on { "[x] " } else { "[ ] " };
        filters.push(Span::styled(
            format!("{}{}  ", mark, field.as_str()),
            if on { theme::SUCCESS } else { theme::DIM },
        ));
    }
    filters.push(Span::styled(
        format!("Sort: {}", search.sort.as_str()),
        theme::DIM,
    ));
    f.render_widget(Paragraph::new(Line::from(filters)), rows[1]);

    if search.results.is_empty() {
        let msg = if search.searching {
            "Searching..."
        } else if search.last_query.is_some() {
            "No patents matched"
        } else {
            "Press / to enter a keyword"
        };
        f.render_widget(Paragraph::new(msg).style(theme::DIM), rows[2]);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Application").style(theme::HEADER),
        Cell::from("Title").style(theme::HEADER),
        Cell::from("Applicant").style(theme::HEADER),
        Cell::from("Filed").style(theme::HEADER),
    ]);

    let table_rows: Vec<Row> = search
        .results
        .iter()
        .enumerate()
        .map(|(i, patent)| {
            let selected = focused && i == search.cursor;
            Row::new(vec![
                Cell::from(patent.application_number.as_str())
                    .style(cursor_style(selected, theme::PATENT_NUMBER)),
                Cell::from(patent.title.as_str()).style(cursor_style(selected, Style::default())),
                Cell::from(patent.applicant.as_deref().unwrap_or("-"))
                    .style(cursor_style(selected, theme::APPLICANT)),
                Cell::from(patent.application_date.as_deref().unwrap_or("-"))
                    .style(cursor_style(selected, theme::DIM)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Min(12),
        Constraint::Length(14),
        Constraint::Length(10),
    ];

    // Summary of the selected patent under the table when there is room.
    let (table_area, detail_area) = if rows[2].height > 10 {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(4)])
            .split(rows[2]);
        (split[0], Some(split[1]))
    } else {
        (rows[2], None)
    };

    f.render_widget(Table::new(table_rows, widths).header(header), table_area);

    if let (Some(detail), Some(patent)) = (detail_area, search.selected()) {
        let summary = patent.summary.as_deref().unwrap_or("No abstract");
        let para = Paragraph::new(summary)
            .style(theme::DIM)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::TOP).border_style(theme::DIM));
        f.render_widget(para, detail);
    }
}

/// The one-column divider. Highlighted while a resize is in progress.
pub fn render_divider(f: &mut Frame, area: Rect, resizing: bool) {
    let (glyph, style) = if resizing {
        ("┃", theme::DIVIDER_RESIZING)
    } else {
        ("│", theme::DIVIDER)
    };
    let mut lines: Vec<Line> = (0..area.height).map(|_| Line::from(glyph)).collect();
    let grip = (area.height / 2) as usize;
    if let Some(line) = lines.get_mut(grip) {
        *line = Line::from("⋮");
    }
    f.render_widget(Paragraph::new(lines).style(style), area);
}

pub fn render_chat_pane(f: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let chat = &state.chat;
    let title = match &chat.conversation_id {
        Some(id) => format!(" AI assistant · {} ", id),
        None => " AI assistant ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_for(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);
    let transcript = rows[0];

    let width = transcript.width.max(1) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for message in &chat.messages {
        let (who, style) = match message.kind {
            MessageKind::User => ("You", theme::MSG_USER),
            MessageKind::Ai => ("AI", theme::MSG_AI),
            MessageKind::System => ("System", theme::MSG_SYSTEM),
        };
        let mut header = vec![Span::styled(who, style)];
        if let Some(name) = &message.file_name {
            header.push(Span::styled(format!("  [file: {}]", name), theme::DIM));
        }
        lines.push(Line::from(header));
        for chunk in wrap_text(&message.content, width) {
            lines.push(Line::from(chunk));
        }
        lines.push(Line::from(""));
    }
    if chat.typing {
        lines.push(Line::from(Span::styled("AI is typing...", theme::DIM)));
    }

    let total = lines.len() as u16;
    let bottom = total.saturating_sub(transcript.height);
    let offset = bottom.saturating_sub(chat.scroll);
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), transcript);

    let input = match state.editing {
        Some(Field::AttachPath) => input_line("Attach file", &chat.attach_path, true, false),
        editing => input_line("Message", &chat.input, editing == Some(Field::ChatInput), false),
    };
    let attached = match &chat.attachment {
        Some(a) => Line::from(Span::styled(
            format!("Attached: {} (Ctrl+X to remove)", a.name),
            theme::WARNING,
        )),
        None => Line::from(Span::styled(
            "i: type | Ctrl+O: attach | Ctrl+N: new conversation",
            theme::DIM,
        )),
    };
    f.render_widget(Paragraph::new(vec![input, attached]), rows[1]);
}

/// Break `text` into lines of at most `width` characters, keeping newlines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width) {
            out.push(chunk.iter().collect());
        }
    }
    out
}

pub fn render_history(f: &mut Frame, area: Rect, state: &AppState) {
    let history = &state.history;
    let scope = match history.scope {
        HistoryScope::Shared => "Shared",
        HistoryScope::Mine => "Mine",
    };
    let block = Block::default()
        .title(format!(" Search history · {} ({}) ", scope, history.entries.len()))
        .borders(Borders::ALL)
        .border_style(theme::BORDER_FOCUSED);

    if history.entries.is_empty() {
        let msg = if history.loading {
            "Loading..."
        } else {
            "No searches recorded yet"
        };
        f.render_widget(Paragraph::new(msg).style(theme::DIM).block(block), area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Query").style(theme::HEADER),
        Cell::from("Type").style(theme::HEADER),
        Cell::from("Results").style(theme::HEADER),
        Cell::from("By").style(theme::HEADER),
        Cell::from("When").style(theme::HEADER),
    ]);

    let rows: Vec<Row> = history
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let selected = i == history.cursor;
            Row::new(vec![
                Cell::from(entry.query.as_str()).style(cursor_style(selected, Style::default())),
                Cell::from(entry.search_type.as_str()).style(cursor_style(selected, theme::DIM)),
                Cell::from(entry.results_count.to_string()).style(cursor_style(selected, theme::DIM)),
                Cell::from(entry.created_by_name.as_deref().unwrap_or("-"))
                    .style(cursor_style(selected, theme::APPLICANT)),
                Cell::from(relative_time(&entry.created_at)).style(cursor_style(selected, theme::DIM)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Length(10),
    ];
    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

fn request_table<'a>(requests: &'a [AdminRequest], cursor: usize, block: Block<'a>) -> Table<'a> {
    let header = Row::new(vec![
        Cell::from("#").style(theme::HEADER),
        Cell::from("Type").style(theme::HEADER),
        Cell::from("User").style(theme::HEADER),
        Cell::from("Department").style(theme::HEADER),
        Cell::from("Requested").style(theme::HEADER),
        Cell::from("Status").style(theme::HEADER),
    ]);
    let rows: Vec<Row> = requests
        .iter()
        .enumerate()
        .map(|(i, req)| {
            let status_style = match req.status {
                RequestStatus::Pending => theme::WARNING,
                RequestStatus::Approved => theme::SUCCESS,
                RequestStatus::Rejected => theme::ERROR,
            };
            Row::new(vec![
                Cell::from(req.request_id.to_string()),
                Cell::from(req.request_type.label()),
                Cell::from(req.user_name.as_deref().unwrap_or("-")),
                Cell::from(req.department_name.as_deref().unwrap_or("-")),
                Cell::from(short_timestamp(&req.requested_at)),
                Cell::from(req.status.as_str()).style(status_style),
            ])
            .style(cursor_style(i == cursor, Style::default()))
        })
        .collect();
    let widths = [
        Constraint::Length(6),
        Constraint::Length(15),
        Constraint::Min(12),
        Constraint::Length(14),
        Constraint::Length(17),
        Constraint::Length(9),
    ];
    Table::new(rows, widths).header(header).block(block)
}

pub fn render_admin(f: &mut Frame, area: Rect, state: &AppState) {
    let admin = &state.admin;
    let tabs = match admin.tab {
        AdminTab::Requests => "[Requests]  Resets   Users ",
        AdminTab::Resets => " Requests  [Resets]  Users ",
        AdminTab::Users => " Requests   Resets  [Users]",
    };
    let filter = match (admin.tab, admin.status_filter) {
        (AdminTab::Users, Some(status)) => format!(" · status: {}", status.as_str()),
        (AdminTab::Users, None) => " · status: all".to_string(),
        _ => String::new(),
    };
    let block = Block::default()
        .title(format!(" Admin console · {}{} ", tabs, filter))
        .borders(Borders::ALL)
        .border_style(theme::BORDER_FOCUSED);

    if admin.row_count() == 0 {
        let msg = if admin.loading { "Loading..." } else { "Nothing here" };
        f.render_widget(Paragraph::new(msg).style(theme::DIM).block(block), area);
        return;
    }

    match admin.tab {
        AdminTab::Requests => {
            f.render_widget(request_table(&admin.requests, admin.cursor, block), area);
        }
        AdminTab::Resets => {
            f.render_widget(request_table(&admin.resets, admin.cursor, block), area);
        }
        AdminTab::Users => {
            let header = Row::new(vec![
                Cell::from("Username").style(theme::HEADER),
                Cell::from("Email").style(theme::HEADER),
                Cell::from("Role").style(theme::HEADER),
                Cell::from("Status").style(theme::HEADER),
                Cell::from("Last login").style(theme::HEADER),
            ]);
            let rows: Vec<Row> = admin
                .users
                .iter()
                .enumerate()
                .map(|(i, user)| {
                    let selected = i == admin.cursor;
                    let status_style = match user.status {
                        UserStatus::Active => theme::SUCCESS,
                        UserStatus::Pending => theme::WARNING,
                        UserStatus::Suspended => theme::ERROR,
                    };
                    Row::new(vec![
                        Cell::from(user.username.as_str()),
                        Cell::from(user.email.as_str()),
                        Cell::from(user.role.label()),
                        Cell::from(user.status.as_str()).style(status_style),
                        Cell::from(
                            user.last_login
                                .as_ref()
                                .map(relative_time)
                                .unwrap_or_else(|| "never".to_string()),
                        ),
                    ])
                    .style(cursor_style(selected, Style::default()))
                })
                .collect();
            let widths = [
                Constraint::Length(16),
                Constraint::Min(16),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(10),
            ];
            f.render_widget(Table::new(rows, widths).header(header).block(block), area);
        }
    }
}

fn key_hints(state: &AppState) -> &'static str {
    use crate::app::state::Screen;

    if state.modal.is_some() {
        return "Tab: next field | Enter: confirm | Esc: cancel";
    }
    if state.editing.is_some() && state.screen != Screen::Login {
        return "Enter: submit | Esc: stop editing";
    }
    match state.screen {
        Screen::Login => "Ctrl+C: quit",
        Screen::Workspace => {
            "1/2/3: mode | [ ]: resize | =: reset | Tab: pane | /: search | n/p: page | F2: history | q: quit"
        }
        Screen::History => "Tab: shared/mine | Enter: rerun | d: delete | r: refresh | F1: workspace",
        Screen::Admin => match state.admin.tab {
            AdminTab::Resets => "Tab: tab | a/p: set temporary password | x: reject | r: refresh | F1: workspace",
            _ => {
                "Tab: tab | a/x: approve/reject | s: status | D: delete | p: password | f: filter | F1: workspace"
            }
        },
    }
}

pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let hints = key_hints(state);

    let right = match state.current_user() {
        Some(user) => format!(
            "{} ({}) | {} {:.0}%",
            user.username,
            user.role.label(),
            state.mode.label(),
            state.width.percent()
        ),
        None => String::new(),
    };

    let mut spans = vec![Span::styled(hints, theme::STATUS_BAR)];
    let mut used = hints.chars().count();
    if let Some(notice) = &state.notice {
        let text = format!(" {} ", notice);
        used += text.chars().count() + 1;
        spans.push(Span::styled(" ", theme::STATUS_BAR));
        spans.push(Span::styled(text, theme::NOTICE));
    }
    let padding = (area.width as usize).saturating_sub(used + right.chars().count());
    spans.push(Span::styled(" ".repeat(padding), theme::STATUS_BAR));
    spans.push(Span::styled(right, theme::STATUS_BAR));

    f.render_widget(Paragraph::new(Line::from(spans)).style(theme::STATUS_BAR), area);
}

pub fn render_modal(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(modal) = &state.modal else {
        return;
    };

    let (title, mut lines, form_error) = match modal {
        Modal::ChangePassword(form) => (
            " Change password ".to_string(),
            vec![
                input_line(
                    "Current password",
                    &form.current,
                    state.editing == Some(Field::CurrentPassword),
                    true,
                ),
                input_line(
                    "New password",
                    &form.new,
                    state.editing == Some(Field::NewPassword),
                    true,
                ),
                input_line(
                    "Confirm",
                    &form.confirm,
                    state.editing == Some(Field::ConfirmPassword),
                    true,
                ),
            ],
            form.error.as_deref(),
        ),
        Modal::ResetPassword { username, form, .. } => (
            format!(" Reset password for {} ", username),
            vec![
                input_line(
                    "Temporary password",
                    &form.new,
                    state.editing == Some(Field::NewPassword),
                    true,
                ),
                input_line(
                    "Confirm",
                    &form.confirm,
                    state.editing == Some(Field::ConfirmPassword),
                    true,
                ),
            ],
            form.error.as_deref(),
        ),
        Modal::Confirm(ConfirmAction::DeleteUser { username, .. }) => (
            " Confirm ".to_string(),
            vec![
                Line::from(format!("Delete user {}? This cannot be undone.", username)),
                Line::from(""),
                Line::from(Span::styled("y: delete | n: cancel", theme::DIM)),
            ],
            None,
        ),
        Modal::Confirm(ConfirmAction::RequestDeptAdmin {
            department_name, ..
        }) => (
            " Request admin role ".to_string(),
            vec![
                Line::from(format!("Ask to become admin of {}?", department_name)),
                Line::from(""),
                Line::from(Span::styled("y: send request | n: cancel", theme::DIM)),
            ],
            None,
        ),
    };

    if let Some(err) = form_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(err.to_string(), theme::ERROR)));
    }

    let height = lines.len() as u16 + 2;
    let modal_area = centered_rect(area, 60, height);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme::BORDER_FOCUSED);

    f.render_widget(Clear, modal_area);
    f.render_widget(Paragraph::new(lines).block(block), modal_area);
}

pub fn render_error_modal(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(ref msg) = state.error_message else {
        return;
    };

    let modal_width = (area.width / 2).max(40).min(area.width.saturating_sub(4));
    let inner_width = modal_width.saturating_sub(2).max(1) as usize;
    let wrapped = wrap_text(msg, inner_width);
    let modal_area = centered_rect(area, modal_width, wrapped.len() as u16 + 4);

    f.render_widget(Clear, modal_area);

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(theme::ERROR);

    let mut text: Vec<Line> = wrapped
        .into_iter()
        .map(|l| Line::from(Span::styled(l, theme::ERROR)))
        .collect();
    text.push(Line::from(""));
    text.push(Line::from(Span::styled("Press Esc to dismiss", theme::DIM)));

    f.render_widget(Paragraph::new(text).block(block), modal_area);
}

/// Tab strip across the top of every signed-in screen.
pub fn render_nav(f: &mut Frame, area: Rect, state: &AppState) {
    use crate::app::state::Screen;

    let mut entries = vec![
        ("F1 Workspace".to_string(), Screen::Workspace),
        ("F2 History".to_string(), Screen::History),
    ];
    if state.is_admin() {
        let label = match state.pending_badge {
            0 => "F3 Admin".to_string(),
            n => format!("F3 Admin ({})", n),
        };
        entries.push((label, Screen::Admin));
    }

    let mut spans = Vec::new();
    for (label, screen) in entries {
        let style = if state.screen == screen {
            theme::HIGHLIGHT
        } else if screen == Screen::Admin && state.pending_badge > 0 {
            theme::WARNING
        } else {
            theme::DIM
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::raw(" "));
    }
    let extras = if state.role() == Some(Role::User) {
        " F4 Password  F5 Dept admin  L Logout "
    } else {
        " F4 Password  L Logout "
    };
    spans.push(Span::styled(extras, theme::DIM));
    if state.focused_pane == FocusedPane::Chat && state.chat.typing {
        spans.push(Span::styled(" · AI is typing", theme::WARNING));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
