use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    DeptAdmin,
    SuperAdmin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::DeptAdmin | Role::SuperAdmin)
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::DeptAdmin => "dept admin",
            Role::SuperAdmin => "super admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Pending,
    Suspended,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Pending => "pending",
            UserStatus::Suspended => "suspended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub company: Option<u64>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub department: Option<u64>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
    pub tokens: Tokens,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Company {
    pub company_id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Department {
    pub department_id: u64,
    pub company: u64,
    pub name: String,
}

/// Body of `POST /api/accounts/register/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    pub company: u64,
    pub department: u64,
}

/// Body of the anonymous password reset request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetRequest {
    pub username: String,
    pub email: String,
    pub company: u64,
    pub department: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Abstract,
    Claims,
}

impl SearchField {
    pub const ALL: [SearchField; 3] = [SearchField::Title, SearchField::Abstract, SearchField::Claims];

    pub fn as_str(self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Abstract => "abstract",
            SearchField::Claims => "claims",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(SearchField::Title),
            "abstract" => Some(SearchField::Abstract),
            "claims" => Some(SearchField::Claims),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    Relevance,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::DateDesc => "date_desc",
            SortOrder::DateAsc => "date_asc",
            SortOrder::Relevance => "relevance",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortOrder::DateDesc => SortOrder::DateAsc,
            SortOrder::DateAsc => SortOrder::Relevance,
            SortOrder::Relevance => SortOrder::DateDesc,
        }
    }
}

/// One patent search request as the search pane builds it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub keyword: String,
    pub fields: Vec<SearchField>,
    pub page: u32,
    pub page_size: u32,
    pub sort: SortOrder,
}

impl SearchQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("keyword", self.keyword.clone())];
        for field in &self.fields {
            pairs.push(("search_fields", field.as_str().to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("page_size", self.page_size.to_string()));
        pairs.push(("sort_by", self.sort.as_str().to_string()));
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub application_number: String,
    #[serde(default)]
    pub application_date: Option<String>,
    #[serde(default)]
    pub applicant: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(rename = "abstract", default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchPage {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub results: Vec<Patent>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default)]
    pub page_size: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Ai,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub kind: MessageKind,
    pub content: String,
    pub file_name: Option<String>,
}

impl ChatMessage {
    pub fn new(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            file_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: Option<String>,
    pub file_content: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatReplyMessage {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub conversation_id: String,
    pub ai_message: ChatReplyMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryScope {
    Shared,
    Mine,
}

impl HistoryScope {
    pub fn query_pair(self) -> (&'static str, &'static str) {
        match self {
            HistoryScope::Shared => ("shared", "true"),
            HistoryScope::Mine => ("my", "true"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub history_id: String,
    pub query: String,
    #[serde(default)]
    pub search_type: String,
    #[serde(default)]
    pub results_count: u64,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_shared: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[default]
    UserApproval,
    DeptAdmin,
    PasswordReset,
}

impl RequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestType::UserApproval => "user_approval",
            RequestType::DeptAdmin => "dept_admin",
            RequestType::PasswordReset => "password_reset",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RequestType::UserApproval => "approval",
            RequestType::DeptAdmin => "dept admin",
            RequestType::PasswordReset => "password reset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRequest {
    pub request_id: u64,
    #[serde(default)]
    pub request_type: RequestType,
    /// Id of the requesting user.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub department_name: Option<String>,
    pub requested_at: DateTime<Utc>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminRequestList {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub requests: Vec<AdminRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub users: Vec<User>,
}
