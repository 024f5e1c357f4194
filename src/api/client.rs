use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::error::ApiError;
use super::models::*;

/// Client for the PatentAI REST API.
///
/// Clones share the token pair, so a refresh done by one background task is
/// seen by every other.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<RwLock<Option<Tokens>>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            bail!("API base URL must use http or https: {}", base_url);
        }

        let client = Client::builder()
            .user_agent("veraclaim")
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_tokens(&self, tokens: Option<Tokens>) {
        if let Ok(mut guard) = self.tokens.write() {
            *guard = tokens;
        }
    }

    pub fn tokens(&self) -> Option<Tokens> {
        self.tokens.read().ok().and_then(|guard| guard.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<reqwest::Response, ApiError> {
        let mut req = self.client.request(method, self.url(path)).query(query);
        if authenticated {
            let access = self.tokens().map(|t| t.access).ok_or(ApiError::NoSession)?;
            req = req.bearer_auth(access);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }
        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?
        };
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Authenticated request. A 401 triggers one token refresh and retry.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let mut resp = self
            .send_once(method.clone(), path, query, body.as_ref(), true)
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED && self.refresh_access_token().await? {
            debug!(path = path, "Retrying after token refresh");
            resp = self.send_once(method, path, query, body.as_ref(), true).await?;
        }

        Self::decode(resp).await
    }

    /// Swap the access token using the refresh token. `Ok(false)` means the
    /// refresh token is missing or was rejected.
    pub async fn refresh_access_token(&self) -> Result<bool, ApiError> {
        let Some(current) = self.tokens() else {
            return Ok(false);
        };

        let body = json!({ "refresh": current.refresh });
        let resp = self
            .send_once(Method::POST, "/api/accounts/token/refresh/", &[], Some(&body), false)
            .await?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "Token refresh rejected");
            return Ok(false);
        }

        let data: Value = Self::decode(resp).await?;
        let Some(access) = data["access"].as_str() else {
            return Err(ApiError::Decode("refresh response missing access token".into()));
        };
        let refresh = data["refresh"]
            .as_str()
            .map(str::to_string)
            .unwrap_or(current.refresh);

        self.set_tokens(Some(Tokens {
            access: access.to_string(),
            refresh,
        }));
        debug!("Access token refreshed");
        Ok(true)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = json!({ "username": username, "password": password });
        let resp = self
            .send_once(Method::POST, "/api/accounts/login/", &[], Some(&body), false)
            .await?;
        let login: LoginResponse = Self::decode(resp).await?;
        self.set_tokens(Some(login.tokens.clone()));
        debug!(username = %login.user.username, "Logged in");
        Ok(login)
    }

    /// Revoke `tokens` on the server. Sent with exactly the tokens given and
    /// never retried, so a session started meanwhile is left alone.
    pub async fn logout(&self, tokens: &Tokens) -> Result<(), ApiError> {
        let resp = self
            .client
            .post(self.url("/api/accounts/logout/"))
            .bearer_auth(&tokens.access)
            .json(&json!({ "refresh": tokens.refresh }))
            .send()
            .await?;
        let _: Value = Self::decode(resp).await?;
        debug!("Server session revoked");
        Ok(())
    }

    pub async fn fetch_me(&self) -> Result<User, ApiError> {
        self.request(Method::GET, "/api/accounts/me/", &[], None).await
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirm: &str,
    ) -> Result<(), ApiError> {
        let body = json!({
            "old_password": old_password,
            "new_password": new_password,
            "new_password_confirm": confirm,
        });
        let _: Value = self
            .request(Method::POST, "/api/accounts/change-password/", &[], Some(body))
            .await?;
        Ok(())
    }

    /// Unauthenticated request that decodes the reply body.
    async fn public<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let resp = self
            .send_once(method, path, &[], body.as_ref(), false)
            .await?;
        Self::decode(resp).await
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>, ApiError> {
        self.public(Method::GET, "/api/accounts/companies/", None).await
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, ApiError> {
        self.public(Method::GET, "/api/accounts/departments/", None).await
    }

    pub async fn register(&self, signup: &SignupRequest) -> Result<String, ApiError> {
        let body = serde_json::to_value(signup).map_err(|e| ApiError::Decode(e.to_string()))?;
        let data: Value = self
            .public(Method::POST, "/api/accounts/register/", Some(body))
            .await?;
        debug!(username = %signup.username, "Registered account");
        Ok(message_or(&data, "Registration submitted"))
    }

    pub async fn request_password_reset(&self, reset: &ResetRequest) -> Result<String, ApiError> {
        let body = serde_json::to_value(reset).map_err(|e| ApiError::Decode(e.to_string()))?;
        let data: Value = self
            .public(
                Method::POST,
                "/api/accounts/password-resets/request-anonymous/",
                Some(body),
            )
            .await?;
        Ok(message_or(&data, "Password reset requested"))
    }

    /// Ask for the department admin role on `department`.
    pub async fn request_dept_admin(&self, department: u64, note: &str) -> Result<String, ApiError> {
        let body = json!({ "department": department, "note": note });
        let data: Value = self
            .request(
                Method::POST,
                "/api/accounts/admin-requests/request-admin-role/",
                &[],
                Some(body),
            )
            .await?;
        Ok(message_or(&data, "Department admin role requested"))
    }

    pub async fn search_patents(&self, query: &SearchQuery) -> Result<SearchPage, ApiError> {
        let pairs = query.to_query_pairs();
        let page: SearchPage = self
            .request(Method::GET, "/api/patents/search/", &pairs, None)
            .await?;
        debug!(
            keyword = %query.keyword,
            page = page.current_page,
            count = page.results.len(),
            "Patent search complete"
        );
        Ok(page)
    }

    pub async fn record_search(&self, query: &str, results_count: u64) -> Result<(), ApiError> {
        let body = json!({
            "query": query,
            "search_type": "patent",
            "results_count": results_count,
            "is_shared": true,
        });
        let _: Value = self
            .request(Method::POST, "/api/accounts/history/", &[], Some(body))
            .await?;
        Ok(())
    }

    pub async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(Method::POST, "/api/chatbot/send/", &[], Some(body))
            .await
    }

    pub async fn list_history(&self, scope: HistoryScope) -> Result<Vec<HistoryEntry>, ApiError> {
        let (key, value) = scope.query_pair();
        let entries: Vec<HistoryEntry> = self
            .request(
                Method::GET,
                "/api/accounts/history/",
                &[(key, value.to_string())],
                None,
            )
            .await?;
        debug!(?scope, count = entries.len(), "Fetched history");
        Ok(entries)
    }

    pub async fn delete_history(&self, history_id: &str) -> Result<(), ApiError> {
        let path = format!("/api/accounts/history/{}/", history_id);
        let _: Value = self.request(Method::DELETE, &path, &[], None).await?;
        Ok(())
    }

    pub async fn list_admin_requests(
        &self,
        status: Option<RequestStatus>,
        request_type: Option<RequestType>,
    ) -> Result<Vec<AdminRequest>, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(kind) = request_type {
            query.push(("request_type", kind.as_str().to_string()));
        }
        let list: AdminRequestList = self
            .request(Method::GET, "/api/accounts/admin-requests/", &query, None)
            .await?;
        debug!(count = list.count, ?status, ?request_type, "Fetched admin requests");
        Ok(list.requests)
    }

    /// Password reset requests. The list endpoint may omit `request_type`,
    /// so every row is tagged here.
    pub async fn list_password_resets(&self) -> Result<Vec<AdminRequest>, ApiError> {
        let mut resets = self
            .list_admin_requests(None, Some(RequestType::PasswordReset))
            .await?;
        for reset in &mut resets {
            reset.request_type = RequestType::PasswordReset;
        }
        Ok(resets)
    }

    pub async fn handle_admin_request(
        &self,
        request_id: u64,
        decision: RequestStatus,
        note: &str,
    ) -> Result<(), ApiError> {
        let path = format!("/api/accounts/admin-requests/{}/handle/", request_id);
        let body = json!({ "status": decision.as_str(), "note": note });
        let _: Value = self.request(Method::POST, &path, &[], Some(body)).await?;
        Ok(())
    }

    pub async fn list_users(&self, status: Option<UserStatus>) -> Result<Vec<User>, ApiError> {
        let query: Vec<(&str, String)> = status
            .map(|s| vec![("status", s.as_str().to_string())])
            .unwrap_or_default();
        let list: UserList = self
            .request(Method::GET, "/api/accounts/users/", &query, None)
            .await?;
        debug!(count = list.count, "Fetched users");
        Ok(list.users)
    }

    pub async fn update_user_status(&self, user_id: &str, status: UserStatus) -> Result<(), ApiError> {
        let path = format!("/api/accounts/users/{}/status/", user_id);
        let body = json!({ "status": status.as_str() });
        let _: Value = self.request(Method::PATCH, &path, &[], Some(body)).await?;
        Ok(())
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), ApiError> {
        let path = format!("/api/accounts/users/{}/", user_id);
        let _: Value = self.request(Method::DELETE, &path, &[], None).await?;
        Ok(())
    }

    pub async fn reset_user_password(&self, user_id: &str, temp_password: &str) -> Result<(), ApiError> {
        let path = format!("/api/accounts/users/{}/reset-password/", user_id);
        let body = json!({ "temp_password": temp_password });
        let _: Value = self.request(Method::POST, &path, &[], Some(body)).await?;
        Ok(())
    }
}

fn message_or(data: &Value, fallback: &str) -> String {
    data["message"].as_str().unwrap_or(fallback).to_string()
}
