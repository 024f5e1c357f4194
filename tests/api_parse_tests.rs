use reqwest::StatusCode;

use veraclaim::api::ApiError;
use veraclaim::api::error::server_message;
use veraclaim::api::models::{
    AdminRequestList, ChatReply, ChatRequest, Company, Department, HistoryEntry, HistoryScope,
    LoginResponse, RequestStatus, RequestType, ResetRequest, Role, SearchField, SearchPage,
    SearchQuery, SignupRequest, SortOrder, UserList, UserStatus,
};

#[test]
fn test_parse_login_response() {
    let json = r#"{
        "message": "Login successful",
        "user": {
            "user_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "username": "kim",
            "email": "kim@example.com",
            "company": 1,
            "company_name": "Acme",
            "department": 4,
            "department_name": "IP team",
            "role": "super_admin",
            "status": "active",
            "full_name": "Kim",
            "last_login": "2025-10-01T09:30:00Z"
        },
        "tokens": {"access": "aaa", "refresh": "rrr"}
    }"#;

    let login: LoginResponse = serde_json::from_str(json).unwrap();
    assert_eq!(login.user.username, "kim");
    assert_eq!(login.user.role, Role::SuperAdmin);
    assert!(login.user.role.is_admin());
    assert_eq!(login.user.status, UserStatus::Active);
    assert_eq!(login.user.department_name.as_deref(), Some("IP team"));
    assert!(login.user.last_login.is_some());
    assert_eq!(login.tokens.access, "aaa");
    assert_eq!(login.tokens.refresh, "rrr");
}

#[test]
fn test_parse_user_with_missing_optional_fields() {
    let json = r#"{"count": 1, "users": [{"user_id": "u1", "username": "lee", "role": "user"}]}"#;
    let list: UserList = serde_json::from_str(json).unwrap();
    let user = &list.users[0];
    assert_eq!(user.role, Role::User);
    assert!(!user.role.is_admin());
    assert_eq!(user.status, UserStatus::Active);
    assert!(user.company_name.is_none());
    assert!(user.last_login.is_none());
}

#[test]
fn test_parse_search_page() {
    let json = r#"{
        "success": true,
        "keyword": "battery",
        "results": [{
            "id": 12,
            "title": "Solid electrolyte battery",
            "application_number": "10-2020-0012345",
            "application_date": "2020-01-31",
            "applicant": "Acme Energy",
            "registration_number": null,
            "abstract": "A battery with a solid electrolyte."
        }],
        "total_count": 41,
        "total_pages": 5,
        "current_page": 2,
        "page_size": 10
    }"#;

    let page: SearchPage = serde_json::from_str(json).unwrap();
    assert_eq!(page.total_count, 41);
    assert_eq!(page.total_pages, 5);
    assert_eq!(page.current_page, 2);
    let patent = &page.results[0];
    assert_eq!(patent.application_number, "10-2020-0012345");
    assert_eq!(
        patent.summary.as_deref(),
        Some("A battery with a solid electrolyte.")
    );
    assert!(patent.registration_number.is_none());
}

#[test]
fn test_search_page_defaults_to_first_page() {
    let page: SearchPage = serde_json::from_str(r#"{"results": []}"#).unwrap();
    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_pages, 0);
}

#[test]
fn test_search_query_pairs() {
    let query = SearchQuery {
        keyword: "battery".into(),
        fields: vec![SearchField::Title, SearchField::Claims],
        page: 3,
        page_size: 10,
        sort: SortOrder::Relevance,
    };

    let pairs = query.to_query_pairs();
    assert_eq!(
        pairs,
        vec![
            ("keyword", "battery".to_string()),
            ("search_fields", "title".to_string()),
            ("search_fields", "claims".to_string()),
            ("page", "3".to_string()),
            ("page_size", "10".to_string()),
            ("sort_by", "relevance".to_string()),
        ]
    );
}

#[test]
fn test_chat_request_serializes_nulls() {
    let request = ChatRequest {
        message: "Summarize claim 1".into(),
        conversation_id: None,
        file_content: None,
        file_name: None,
    };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["message"], "Summarize claim 1");
    assert!(value["conversation_id"].is_null());
    assert!(value["file_content"].is_null());
}

#[test]
fn test_parse_chat_reply() {
    let json = r#"{
        "conversation_id": "c-42",
        "user_message": {"content": "hi"},
        "ai_message": {"message_id": 9, "sender": "ai", "content": "Hello there"}
    }"#;
    let reply: ChatReply = serde_json::from_str(json).unwrap();
    assert_eq!(reply.conversation_id, "c-42");
    assert_eq!(reply.ai_message.content, "Hello there");
}

#[test]
fn test_parse_history_entries() {
    let json = r#"[{
        "history_id": "h1",
        "query": "battery",
        "search_type": "patent",
        "results_count": 41,
        "created_by": "u1",
        "created_by_name": "kim",
        "created_at": "2025-10-02T08:00:00Z",
        "is_shared": true
    }]"#;
    let entries: Vec<HistoryEntry> = serde_json::from_str(json).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].created_by.as_deref(), Some("u1"));
    assert!(entries[0].is_shared);
}

#[test]
fn test_history_scope_query() {
    assert_eq!(HistoryScope::Shared.query_pair(), ("shared", "true"));
    assert_eq!(HistoryScope::Mine.query_pair(), ("my", "true"));
}

#[test]
fn test_parse_admin_requests() {
    let json = r#"{
        "count": 2,
        "requests": [
            {"request_id": 1, "request_type": "user_approval", "user_name": "park",
             "requested_at": "2025-10-01T00:00:00Z", "status": "pending"},
            {"request_id": 2, "request_type": "password_reset", "user_name": "choi",
             "requested_at": "2025-10-01T01:00:00Z", "status": "approved", "note": "ok"}
        ]
    }"#;
    let list: AdminRequestList = serde_json::from_str(json).unwrap();
    assert_eq!(list.count, 2);
    assert_eq!(list.requests[0].request_type, RequestType::UserApproval);
    assert_eq!(list.requests[0].status, RequestStatus::Pending);
    assert_eq!(list.requests[1].request_type, RequestType::PasswordReset);
    assert_eq!(list.requests[1].note.as_deref(), Some("ok"));
}

#[test]
fn test_admin_request_carries_user_id() {
    let json = r#"{"request_id": 5, "user": "9d2e", "user_name": "lee",
        "requested_at": "2025-10-02T00:00:00Z", "status": "pending"}"#;
    let request: veraclaim::api::models::AdminRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.user.as_deref(), Some("9d2e"));
    assert_eq!(request.request_type, RequestType::UserApproval);
}

#[test]
fn test_parse_directory() {
    let companies: Vec<Company> = serde_json::from_str(
        r#"[{"company_id": 1, "name": "Acme", "domain": "acme.example", "is_active": true}]"#,
    )
    .unwrap();
    assert_eq!(companies[0].name, "Acme");

    let departments: Vec<Department> = serde_json::from_str(
        r#"[{"department_id": 4, "company": 1, "company_name": "Acme", "name": "Patents"}]"#,
    )
    .unwrap();
    assert_eq!(departments[0].company, 1);
    assert_eq!(departments[0].department_id, 4);
}

#[test]
fn test_signup_and_reset_bodies() {
    let signup = SignupRequest {
        username: "new_user".into(),
        email: "new@example.com".into(),
        password: "longenough1".into(),
        password_confirm: "longenough1".into(),
        first_name: "Ji".into(),
        last_name: "Park".into(),
        company: 1,
        department: 4,
    };
    let value = serde_json::to_value(&signup).unwrap();
    assert_eq!(value["password_confirm"], "longenough1");
    assert_eq!(value["department"], 4);

    let reset = ResetRequest {
        username: "kim".into(),
        email: "kim@example.com".into(),
        company: 1,
        department: 4,
    };
    assert_eq!(
        serde_json::to_value(&reset).unwrap(),
        serde_json::json!({
            "username": "kim",
            "email": "kim@example.com",
            "company": 1,
            "department": 4
        })
    );
}

// --- Error bodies ---

#[test]
fn test_server_message_prefers_error_key() {
    let body = r#"{"error": "Account pending approval", "detail": "other"}"#;
    assert_eq!(
        server_message(body).as_deref(),
        Some("Account pending approval")
    );
}

#[test]
fn test_server_message_detail_key() {
    let body = r#"{"detail": "Given token not valid for any token type"}"#;
    assert_eq!(
        server_message(body).as_deref(),
        Some("Given token not valid for any token type")
    );
}

#[test]
fn test_server_message_field_error() {
    let body = r#"{"new_password": ["This password is too common."]}"#;
    assert_eq!(
        server_message(body).as_deref(),
        Some("new_password: This password is too common.")
    );
}

#[test]
fn test_server_message_non_json() {
    assert_eq!(server_message("<html>502</html>"), None);
}

#[test]
fn test_from_status_maps_auth_failures() {
    let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"detail": "expired"}"#);
    assert!(err.is_auth_failure());
    assert_eq!(err.to_string(), "expired");

    let err = ApiError::from_status(StatusCode::FORBIDDEN, r#"{"error": "admins only"}"#);
    assert!(!err.is_auth_failure());
    assert_eq!(err.to_string(), "admins only");
}

#[test]
fn test_from_status_falls_back_to_reason() {
    let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "");
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_client_rejects_non_http_base_url() {
    assert!(veraclaim::api::ApiClient::new("ftp://example.com", 5).is_err());
    assert!(veraclaim::api::ApiClient::new("not a url", 5).is_err());
    let client = veraclaim::api::ApiClient::new("http://localhost:8000/", 5).unwrap();
    assert_eq!(client.base_url(), "http://localhost:8000");
    assert!(client.tokens().is_none());
}
