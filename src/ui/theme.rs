use ratatui::style::{Color, Modifier, Style};

pub const HIGHLIGHT: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Cyan)
    .add_modifier(Modifier::BOLD);

pub const HEADER: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

pub const DIM: Style = Style::new().fg(Color::DarkGray);

pub const ERROR: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

pub const SUCCESS: Style = Style::new().fg(Color::Green);

pub const WARNING: Style = Style::new().fg(Color::Yellow);

pub const BORDER_FOCUSED: Style = Style::new().fg(Color::Cyan);

pub const BORDER_UNFOCUSED: Style = Style::new().fg(Color::DarkGray);

pub const STATUS_BAR: Style = Style::new().fg(Color::White).bg(Color::DarkGray);

pub const NOTICE: Style = Style::new().fg(Color::Black).bg(Color::Yellow);

pub const INPUT_ACTIVE: Style = Style::new().fg(Color::Yellow);

// Divider
pub const DIVIDER: Style = Style::new().fg(Color::DarkGray);

pub const DIVIDER_RESIZING: Style = Style::new()
    .fg(Color::Cyan)
    .add_modifier(Modifier::BOLD);

// Chat transcript
pub const MSG_USER: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

pub const MSG_AI: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

pub const MSG_SYSTEM: Style = Style::new().fg(Color::Magenta);

pub const PATENT_NUMBER: Style = Style::new().fg(Color::Cyan);

pub const APPLICANT: Style = Style::new().fg(Color::Yellow);
