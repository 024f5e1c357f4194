use std::path::PathBuf;

use crate::api::models::{
    AdminRequest, ChatReply, ChatRequest, Company, Department, HistoryEntry, HistoryScope,
    RequestStatus, RequestType, ResetRequest, SearchField, SearchPage, SearchQuery, SignupRequest,
    Tokens, User, UserStatus,
};
use crate::app::state::{Field, LoginMode, Screen};
use crate::layout::Mode;
use crate::session::Session;

#[derive(Debug)]
pub enum Action {
    Quit,
    Tick,
    DismissError,

    // Cursor and text entry
    MoveUp,
    MoveDown,
    SwitchPane,
    SwitchTab,
    StartEdit(Field),
    NextField,
    Input(char),
    Backspace,
    Submit,
    CancelEdit,
    /// Step the company or department picker being edited.
    PickOption(i8),

    // Navigation
    SetLoginMode(LoginMode),
    ShowScreen(Screen),
    OpenChangePassword,
    RequestDeptAdmin,
    Logout,
    Refresh,

    // Split layout
    SetMode(Mode),
    ResetLayout,
    NudgeDivider(i16),
    PointerDown { column: u16, row: u16 },
    PointerMove { column: u16 },
    PointerUp,
    FocusLost,

    // Search pane
    NextPage,
    PrevPage,
    CycleSort,
    ToggleField(SearchField),
    SendToChat,

    // Chat pane
    NewConversation,
    StartAttach,
    ClearAttachment,

    // History and admin lists
    DeleteSelected,
    RerunSelected,
    ApproveRequest,
    RejectRequest,
    ToggleUserStatus,
    DeleteUser,
    ResetUserPassword,
    CycleStatusFilter,
    Confirm(bool),

    // Results from background tasks
    DataLoaded(DataPayload),
    LoadError(String),
    AuthExpired(String),
    SessionCheckFailed(String),
}

#[derive(Debug)]
pub enum DataPayload {
    LoggedIn(Session),
    SessionRestored(User),
    TokensRefreshed(Tokens),
    Directory {
        companies: Vec<Company>,
        departments: Vec<Department>,
    },
    Registered(String),
    SearchResults {
        query: SearchQuery,
        page: SearchPage,
    },
    ChatReply {
        generation: u64,
        reply: ChatReply,
    },
    ChatFailed {
        generation: u64,
        message: String,
    },
    AttachmentLoaded {
        name: String,
        content: String,
    },
    History {
        scope: HistoryScope,
        entries: Vec<HistoryEntry>,
    },
    HistoryDeleted(String),
    AdminRequests(Vec<AdminRequest>),
    PasswordResets(Vec<AdminRequest>),
    PendingCount(usize),
    Users(Vec<User>),
    RequestHandled {
        request_id: u64,
        status: RequestStatus,
    },
    UserStatusChanged {
        user_id: String,
        status: UserStatus,
    },
    UserDeleted(String),
    UserPasswordReset {
        user_id: String,
        username: String,
    },
    PasswordChanged,
    ResetRequested(String),
    RoleRequested(String),
}

#[derive(Debug, PartialEq)]
pub enum SideEffect {
    Login { username: String, password: String },
    FetchDirectory,
    Register(SignupRequest),
    RequestPasswordReset(ResetRequest),
    RestoreSession,
    Logout,
    PersistSession(Session),
    ClearSession,
    Search(SearchQuery),
    RecordSearch { query: String, results_count: u64 },
    SendChat { request: ChatRequest, generation: u64 },
    LoadAttachment(PathBuf),
    FetchHistory(HistoryScope),
    DeleteHistory(String),
    FetchAdminRequests,
    FetchPasswordResets,
    /// Count pending requests, optionally of one type only.
    FetchPendingCount(Option<RequestType>),
    FetchUsers(Option<UserStatus>),
    HandleRequest { request_id: u64, decision: RequestStatus, note: String },
    RequestDeptAdmin { department: u64, note: String },
    SetUserStatus { user_id: String, status: UserStatus },
    DeleteUser(String),
    ResetUserPassword { user_id: String, username: String, password: String },
    ChangePassword { current: String, new: String, confirm: String },
}
