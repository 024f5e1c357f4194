use crate::api::models::{
    AdminRequest, ChatMessage, Company, Department, HistoryEntry, HistoryScope, MessageKind,
    Patent, RequestStatus, RequestType, Role, SearchField, SearchQuery, SortOrder, User, UserStatus,
};
use crate::layout::{DragController, LayoutNodes, Mode, WidthBounds, WidthModel};
use crate::session::Session;

pub const GREETING: &str = "Hello! I'm the patent analysis assistant. I can help with patent \
                            search, document analysis and questions. What would you like to do?";
pub const CHAT_FAILURE_REPLY: &str =
    "Sorry, something went wrong while generating a reply. Please try again shortly.";
pub const FILE_ONLY_MESSAGE: &str = "Uploaded a file.";

const NOTICE_TICKS: u8 = 4;
/// Ticks between refreshes of the admin pending-request badge.
pub const BADGE_POLL_TICKS: u16 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Workspace,
    History,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Search,
    Chat,
}

/// Text fields that can take keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
    Email,
    SignupConfirm,
    FirstName,
    LastName,
    /// Pickers; cycled with the arrow keys rather than typed into.
    Company,
    Department,
    Query,
    ChatInput,
    AttachPath,
    CurrentPassword,
    NewPassword,
    ConfirmPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminTab {
    Requests,
    Resets,
    Users,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    SignIn,
    SignUp,
    /// Anonymous password reset request.
    Reset,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub mode: LoginMode,
    pub username: String,
    pub password: String,
    pub email: String,
    pub confirm: String,
    pub first_name: String,
    pub last_name: String,
    pub company: Option<u64>,
    pub department: Option<u64>,
    pub companies: Vec<Company>,
    pub departments: Vec<Department>,
    pub directory_loaded: bool,
    pub submitting: bool,
}

impl LoginForm {
    fn new(username: String) -> Self {
        Self {
            mode: LoginMode::SignIn,
            username,
            password: String::new(),
            email: String::new(),
            confirm: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            company: None,
            department: None,
            companies: Vec::new(),
            departments: Vec::new(),
            directory_loaded: false,
            submitting: false,
        }
    }

    /// Departments of the chosen company.
    pub fn company_departments(&self) -> Vec<&Department> {
        match self.company {
            Some(company) => self
                .departments
                .iter()
                .filter(|d| d.company == company)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn company_name(&self) -> Option<&str> {
        let id = self.company?;
        self.companies
            .iter()
            .find(|c| c.company_id == id)
            .map(|c| c.name.as_str())
    }

    pub fn department_name(&self) -> Option<&str> {
        let id = self.department?;
        self.departments
            .iter()
            .find(|d| d.department_id == id)
            .map(|d| d.name.as_str())
    }

    /// Step the company picker; the department is chosen again afterwards.
    pub fn step_company(&mut self, step: isize) {
        let ids: Vec<u64> = self.companies.iter().map(|c| c.company_id).collect();
        let next = step_choice(&ids, self.company, step);
        if next != self.company {
            self.company = next;
            self.department = None;
        }
    }

    pub fn step_department(&mut self, step: isize) {
        let ids: Vec<u64> = self
            .company_departments()
            .iter()
            .map(|d| d.department_id)
            .collect();
        self.department = step_choice(&ids, self.department, step);
    }

    /// Empty every field except the username and the loaded directory.
    pub fn clear_entries(&mut self) {
        self.password.clear();
        self.email.clear();
        self.confirm.clear();
        self.first_name.clear();
        self.last_name.clear();
        self.company = None;
        self.department = None;
    }
}

fn step_choice(ids: &[u64], current: Option<u64>, step: isize) -> Option<u64> {
    if ids.is_empty() {
        return None;
    }
    let next = match current.and_then(|id| ids.iter().position(|i| *i == id)) {
        Some(pos) => (pos as isize + step).rem_euclid(ids.len() as isize) as usize,
        None if step < 0 => ids.len() - 1,
        None => 0,
    };
    Some(ids[next])
}

#[derive(Debug, Clone)]
pub struct SearchPane {
    pub query: String,
    pub fields: Vec<SearchField>,
    pub sort: SortOrder,
    pub page_size: u32,
    pub results: Vec<Patent>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub last_query: Option<SearchQuery>,
    pub cursor: usize,
    pub searching: bool,
}

impl SearchPane {
    pub fn build_query(&self, page: u32) -> SearchQuery {
        SearchQuery {
            keyword: self.query.trim().to_string(),
            fields: self.fields.clone(),
            page,
            page_size: self.page_size,
            sort: self.sort,
        }
    }

    pub fn selected(&self) -> Option<&Patent> {
        self.results.get(self.cursor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ChatPane {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub attach_path: String,
    pub attachment: Option<Attachment>,
    pub conversation_id: Option<String>,
    /// Bumped by every new conversation; replies carry the value they
    /// were sent under.
    pub generation: u64,
    pub typing: bool,
    /// Lines scrolled up from the bottom of the transcript.
    pub scroll: u16,
}

impl Default for ChatPane {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::new(MessageKind::Ai, GREETING)],
            input: String::new(),
            attach_path: String::new(),
            attachment: None,
            conversation_id: None,
            generation: 0,
            typing: false,
            scroll: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryView {
    pub scope: HistoryScope,
    pub entries: Vec<HistoryEntry>,
    pub cursor: usize,
    pub loading: bool,
}

impl Default for HistoryView {
    fn default() -> Self {
        Self {
            scope: HistoryScope::Shared,
            entries: Vec::new(),
            cursor: 0,
            loading: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminView {
    pub tab: AdminTab,
    pub requests: Vec<AdminRequest>,
    pub resets: Vec<AdminRequest>,
    pub users: Vec<User>,
    pub status_filter: Option<UserStatus>,
    pub cursor: usize,
    pub loading: bool,
}

impl Default for AdminView {
    fn default() -> Self {
        Self {
            tab: AdminTab::Requests,
            requests: Vec::new(),
            resets: Vec::new(),
            users: Vec::new(),
            status_filter: None,
            cursor: 0,
            loading: false,
        }
    }
}

impl AdminView {
    pub fn row_count(&self) -> usize {
        match self.tab {
            AdminTab::Requests => self.requests.len(),
            AdminTab::Resets => self.resets.len(),
            AdminTab::Users => self.users.len(),
        }
    }

    /// Mark the pending password resets of `user_id` as approved.
    pub fn settle_resets(&mut self, user_id: &str) {
        for list in [&mut self.requests, &mut self.resets] {
            for req in list.iter_mut() {
                if req.request_type == RequestType::PasswordReset
                    && req.status == RequestStatus::Pending
                    && req.user.as_deref() == Some(user_id)
                {
                    req.status = RequestStatus::Approved;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteUser { user_id: String, username: String },
    RequestDeptAdmin { department: u64, department_name: String },
}

#[derive(Debug, Clone)]
pub enum Modal {
    ChangePassword(PasswordForm),
    ResetPassword {
        user_id: String,
        username: String,
        form: PasswordForm,
    },
    Confirm(ConfirmAction),
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub session: Option<Session>,

    pub login: LoginForm,
    pub search: SearchPane,
    pub chat: ChatPane,
    pub history: HistoryView,
    pub admin: AdminView,

    // Split layout
    pub mode: Mode,
    pub width: WidthModel,
    pub drag: DragController,
    pub mounted: LayoutNodes,
    pub nudge_columns: u16,
    pub focused_pane: FocusedPane,

    // Input
    pub editing: Option<Field>,
    pub modal: Option<Modal>,

    // UI flags
    pub error_message: Option<String>,
    pub notice: Option<String>,
    pub notice_ticks: u8,
    /// Pending requests awaiting this admin, shown next to the Admin tab.
    pub pending_badge: usize,
    pub badge_ticks: u16,
    pub should_quit: bool,
}

/// Startup options taken from the config file.
#[derive(Debug, Clone)]
pub struct StateOptions {
    pub bounds: WidthBounds,
    pub mode: Mode,
    pub nudge_columns: u16,
    pub fields: Vec<SearchField>,
    pub sort: SortOrder,
    pub page_size: u32,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            bounds: WidthBounds::default(),
            mode: Mode::Split,
            nudge_columns: 2,
            fields: SearchField::ALL.to_vec(),
            sort: SortOrder::default(),
            page_size: 10,
        }
    }
}

impl AppState {
    pub fn new(session: Option<Session>, options: StateOptions) -> Self {
        let (screen, editing) = if session.is_some() {
            (Screen::Workspace, None)
        } else {
            (Screen::Login, Some(Field::Username))
        };

        let username = session
            .as_ref()
            .map(|s| s.user.username.clone())
            .unwrap_or_default();

        let focused_pane = if options.mode == Mode::Chat {
            FocusedPane::Chat
        } else {
            FocusedPane::Search
        };

        Self {
            screen,
            session,
            login: LoginForm::new(username),
            search: SearchPane {
                query: String::new(),
                fields: options.fields,
                sort: options.sort,
                page_size: options.page_size,
                results: Vec::new(),
                current_page: 1,
                total_pages: 0,
                total_count: 0,
                last_query: None,
                cursor: 0,
                searching: false,
            },
            chat: ChatPane::default(),
            history: HistoryView::default(),
            admin: AdminView::default(),
            mode: options.mode,
            width: WidthModel::new(options.bounds),
            drag: DragController::new(),
            mounted: LayoutNodes::new(),
            nudge_columns: options.nudge_columns,
            focused_pane,
            editing,
            modal: None,
            error_message: None,
            notice: None,
            notice_ticks: 0,
            pending_badge: 0,
            badge_ticks: 0,
            should_quit: false,
        }
    }

    /// Drop everything the signed-in user saw or typed. Search options
    /// from the config survive; a reply still in flight is orphaned.
    pub fn forget_user_data(&mut self) {
        let search = &mut self.search;
        search.query.clear();
        search.results.clear();
        search.current_page = 1;
        search.total_pages = 0;
        search.total_count = 0;
        search.last_query = None;
        search.cursor = 0;
        search.searching = false;

        let generation = self.chat.generation + 1;
        self.chat = ChatPane {
            generation,
            ..ChatPane::default()
        };
        self.history = HistoryView::default();
        self.admin = AdminView::default();
        self.pending_badge = 0;
        self.badge_ticks = 0;
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user().map(|u| u.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(Role::is_admin)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role() == Some(Role::SuperAdmin)
    }

    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(text.into());
        self.notice_ticks = NOTICE_TICKS;
    }

    /// Mutable text behind an input field, if that field exists right now.
    pub fn field_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Username => Some(&mut self.login.username),
            Field::Password => Some(&mut self.login.password),
            Field::Email => Some(&mut self.login.email),
            Field::SignupConfirm => Some(&mut self.login.confirm),
            Field::FirstName => Some(&mut self.login.first_name),
            Field::LastName => Some(&mut self.login.last_name),
            Field::Company | Field::Department => None,
            Field::Query => Some(&mut self.search.query),
            Field::ChatInput => Some(&mut self.chat.input),
            Field::AttachPath => Some(&mut self.chat.attach_path),
            Field::CurrentPassword | Field::NewPassword | Field::ConfirmPassword => {
                let form = match self.modal.as_mut()? {
                    Modal::ChangePassword(form) => form,
                    Modal::ResetPassword { form, .. } => form,
                    Modal::Confirm(_) => return None,
                };
                Some(match field {
                    Field::CurrentPassword => &mut form.current,
                    Field::NewPassword => &mut form.new,
                    _ => &mut form.confirm,
                })
            }
        }
    }

    /// Fields reachable with Tab in the current context, in order.
    pub fn field_cycle(&self) -> &'static [Field] {
        match &self.modal {
            Some(Modal::ChangePassword(_)) => &[
                Field::CurrentPassword,
                Field::NewPassword,
                Field::ConfirmPassword,
            ],
            Some(Modal::ResetPassword { .. }) => &[Field::NewPassword, Field::ConfirmPassword],
            Some(Modal::Confirm(_)) => &[],
            None if self.screen == Screen::Login => match self.login.mode {
                LoginMode::SignIn => &[Field::Username, Field::Password],
                LoginMode::SignUp => &[
                    Field::Username,
                    Field::Email,
                    Field::Password,
                    Field::SignupConfirm,
                    Field::FirstName,
                    Field::LastName,
                    Field::Company,
                    Field::Department,
                ],
                LoginMode::Reset => &[
                    Field::Username,
                    Field::Email,
                    Field::Company,
                    Field::Department,
                ],
            },
            None => &[],
        }
    }

    pub fn selected_history(&self) -> Option<&HistoryEntry> {
        self.history.entries.get(self.history.cursor)
    }

    pub fn selected_request(&self) -> Option<&AdminRequest> {
        match self.admin.tab {
            AdminTab::Requests => self.admin.requests.get(self.admin.cursor),
            AdminTab::Resets => self.admin.resets.get(self.admin.cursor),
            AdminTab::Users => None,
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        if self.admin.tab != AdminTab::Users {
            return None;
        }
        self.admin.users.get(self.admin.cursor)
    }
}
