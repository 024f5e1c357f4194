use std::future::Future;
use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info, warn};

use crate::api::models::{RequestStatus, Tokens};
use crate::api::{ApiClient, ApiError};
use crate::app::actions::{Action, DataPayload, SideEffect};
use crate::app::state::{AppState, Field, LoginMode, Modal, Screen, StateOptions};
use crate::app::update::update;
use crate::app::view;
use crate::layout::Mode;
use crate::session::{Session, SessionStore};
use crate::util::config::AppConfig;

const TICK_SECS: u64 = 1;
const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

pub async fn run(
    config: AppConfig,
    client: ApiClient,
    session: Option<Session>,
    session_store: Option<SessionStore>,
) -> Result<()> {
    let options = StateOptions {
        bounds: config.layout.bounds()?,
        mode: config.layout.default_mode,
        nudge_columns: config.layout.nudge_columns.max(1),
        fields: config.search.search_fields(),
        sort: config.search.sort_by,
        page_size: config.search.page_size.max(1),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_loop(&mut terminal, options, client, session, session_store).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    options: StateOptions,
    client: ApiClient,
    session: Option<Session>,
    session_store: Option<SessionStore>,
) -> Result<()> {
    let restoring = session.is_some();
    let mut state = AppState::new(session, options);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let semaphore = Arc::new(Semaphore::new(4));

    // Confirm a stored session is still accepted
    if restoring {
        spawn_side_effect(
            SideEffect::RestoreSession,
            &client,
            &session_store,
            &action_tx,
            &semaphore,
        );
    }

    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_timer = tokio::time::interval(tokio::time::Duration::from_secs(TICK_SECS));
    tick_timer.tick().await;

    loop {
        // Render, keeping what this frame mounted for hit tests and resizing
        let mut mounted = None;
        terminal.draw(|f| mounted = Some(view::render(f, &state)))?;
        if let Some(mounted) = mounted {
            state.mounted = mounted;
        }

        if state.should_quit {
            break;
        }

        tokio::select! {
            // Terminal events
            maybe_event = event_stream.next() => {
                if let Some(Ok(event)) = maybe_event
                    && let Some(action) = map_event_to_action(&event, &state) {
                        let effects = update(&mut state, action);
                        for effect in effects {
                            spawn_side_effect(effect, &client, &session_store, &action_tx, &semaphore);
                        }
                    }
            }
            // Actions from background tasks
            Some(action) = action_rx.recv() => {
                let effects = update(&mut state, action);
                for effect in effects {
                    spawn_side_effect(effect, &client, &session_store, &action_tx, &semaphore);
                }
            }
            _ = tick_timer.tick() => {
                let effects = update(&mut state, Action::Tick);
                for effect in effects {
                    spawn_side_effect(effect, &client, &session_store, &action_tx, &semaphore);
                }
            }
        }
    }

    info!("veraclaim exiting");
    Ok(())
}

pub fn map_event_to_action(event: &Event, state: &AppState) -> Option<Action> {
    match event {
        Event::FocusLost => Some(Action::FocusLost),
        Event::Mouse(mouse) => map_mouse(mouse, state),
        Event::Key(key) if key.kind == event::KeyEventKind::Press => map_key(key, state),
        _ => None,
    }
}

/// While a divider drag is active every move and release goes to it,
/// wherever the pointer is. A release still ends the drag under the error
/// modal.
fn map_mouse(mouse: &MouseEvent, state: &AppState) -> Option<Action> {
    let dragging = state.drag.is_dragging();
    if dragging && matches!(mouse.kind, MouseEventKind::Up(_)) {
        return Some(Action::PointerUp);
    }
    if state.error_message.is_some() {
        return None;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::PointerDown {
            column: mouse.column,
            row: mouse.row,
        }),
        MouseEventKind::Drag(_) | MouseEventKind::Moved if dragging => Some(Action::PointerMove {
            column: mouse.column,
        }),
        MouseEventKind::ScrollUp if state.screen != Screen::Login => Some(Action::MoveUp),
        MouseEventKind::ScrollDown if state.screen != Screen::Login => Some(Action::MoveDown),
        _ => None,
    }
}

fn map_key(key: &KeyEvent, state: &AppState) -> Option<Action> {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && *code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    // Handle error modal first
    if state.error_message.is_some() {
        return match code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::DismissError),
            _ => None,
        };
    }

    match &state.modal {
        Some(Modal::Confirm(_)) => {
            return match code {
                KeyCode::Char('y') | KeyCode::Enter => Some(Action::Confirm(true)),
                KeyCode::Char('n') | KeyCode::Esc => Some(Action::Confirm(false)),
                _ => None,
            };
        }
        Some(_) => return map_text_entry(code, true),
        None => {}
    }

    if state.screen == Screen::Login {
        return map_login_key(code, ctrl, state);
    }

    if state.editing.is_some() {
        if ctrl && state.editing == Some(Field::ChatInput) {
            return match code {
                KeyCode::Char('o') => Some(Action::StartAttach),
                KeyCode::Char('x') => Some(Action::ClearAttachment),
                _ => None,
            };
        }
        return map_text_entry(code, false);
    }

    // Navigation shared by every signed-in screen
    match code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::F(1) => return Some(Action::ShowScreen(Screen::Workspace)),
        KeyCode::F(2) => return Some(Action::ShowScreen(Screen::History)),
        KeyCode::F(3) => return Some(Action::ShowScreen(Screen::Admin)),
        KeyCode::F(4) => return Some(Action::OpenChangePassword),
        KeyCode::F(5) => return Some(Action::RequestDeptAdmin),
        KeyCode::Char('L') => return Some(Action::Logout),
        KeyCode::Char('r') if !ctrl => return Some(Action::Refresh),
        KeyCode::Char('j') | KeyCode::Down => return Some(Action::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => return Some(Action::MoveUp),
        _ => {}
    }

    match state.screen {
        Screen::Workspace => map_workspace_key(code, ctrl),
        Screen::History => match code {
            KeyCode::Tab | KeyCode::BackTab => Some(Action::SwitchTab),
            KeyCode::Char('d') => Some(Action::DeleteSelected),
            KeyCode::Enter => Some(Action::RerunSelected),
            _ => None,
        },
        Screen::Admin => match code {
            KeyCode::Tab | KeyCode::BackTab => Some(Action::SwitchTab),
            KeyCode::Char('a') => Some(Action::ApproveRequest),
            KeyCode::Char('x') => Some(Action::RejectRequest),
            KeyCode::Char('s') => Some(Action::ToggleUserStatus),
            KeyCode::Char('D') => Some(Action::DeleteUser),
            KeyCode::Char('p') => Some(Action::ResetUserPassword),
            KeyCode::Char('f') => Some(Action::CycleStatusFilter),
            _ => None,
        },
        Screen::Login => None,
    }
}

fn map_login_key(code: &KeyCode, ctrl: bool, state: &AppState) -> Option<Action> {
    let mode = state.login.mode;
    if ctrl {
        let target = match code {
            KeyCode::Char('n') => LoginMode::SignUp,
            KeyCode::Char('r') => LoginMode::Reset,
            _ => return None,
        };
        let next = if mode == target {
            LoginMode::SignIn
        } else {
            target
        };
        return Some(Action::SetLoginMode(next));
    }
    let picking = matches!(state.editing, Some(Field::Company | Field::Department));
    match code {
        KeyCode::Left if picking => Some(Action::PickOption(-1)),
        KeyCode::Right if picking => Some(Action::PickOption(1)),
        _ => map_text_entry(code, true),
    }
}

fn map_workspace_key(code: &KeyCode, ctrl: bool) -> Option<Action> {
    use crate::api::models::SearchField;

    if ctrl {
        return match code {
            KeyCode::Char('o') => Some(Action::StartAttach),
            KeyCode::Char('n') => Some(Action::NewConversation),
            KeyCode::Char('x') => Some(Action::ClearAttachment),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('1') => Some(Action::SetMode(Mode::Split)),
        KeyCode::Char('2') => Some(Action::SetMode(Mode::Search)),
        KeyCode::Char('3') => Some(Action::SetMode(Mode::Chat)),
        KeyCode::Char('=') => Some(Action::ResetLayout),
        KeyCode::Char('[') => Some(Action::NudgeDivider(-1)),
        KeyCode::Char(']') => Some(Action::NudgeDivider(1)),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::SwitchPane),
        KeyCode::Char('/') => Some(Action::StartEdit(Field::Query)),
        KeyCode::Char('i') => Some(Action::StartEdit(Field::ChatInput)),
        KeyCode::Char('n') => Some(Action::NextPage),
        KeyCode::Char('p') => Some(Action::PrevPage),
        KeyCode::Char('s') => Some(Action::CycleSort),
        KeyCode::Char('t') => Some(Action::ToggleField(SearchField::Title)),
        KeyCode::Char('b') => Some(Action::ToggleField(SearchField::Abstract)),
        KeyCode::Char('c') => Some(Action::ToggleField(SearchField::Claims)),
        KeyCode::Char('>') => Some(Action::SendToChat),
        KeyCode::Enter => Some(Action::Submit),
        _ => None,
    }
}

fn map_text_entry(code: &KeyCode, tab_cycles: bool) -> Option<Action> {
    match code {
        KeyCode::Esc => Some(Action::CancelEdit),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Tab | KeyCode::BackTab if tab_cycles => Some(Action::NextField),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) => Some(Action::Input(*c)),
        _ => None,
    }
}

/// Run `request` on a background task and report its outcome as an action.
///
/// A rejected session becomes `AuthExpired`; a token refresh that happened
/// along the way is reported first so it can be persisted.
fn spawn_request<T, Fut>(
    label: &'static str,
    client: &ApiClient,
    action_tx: &mpsc::UnboundedSender<Action>,
    semaphore: &Arc<Semaphore>,
    request: impl FnOnce(ApiClient) -> Fut + Send + 'static,
    on_success: impl FnOnce(T) -> Action + Send + 'static,
    on_failure: impl FnOnce(String) -> Action + Send + 'static,
) where
    T: Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let client = client.clone();
    let tx = action_tx.clone();
    let sem = semaphore.clone();

    tokio::spawn(async move {
        let _permit = sem.acquire().await;
        debug!(request = label, "Sending request");

        let before = client.tokens();
        let result = request(client.clone()).await;
        let after = client.tokens();
        if before.is_some()
            && after != before
            && let Some(tokens) = after
        {
            let _ = tx.send(Action::DataLoaded(DataPayload::TokensRefreshed(tokens)));
        }

        match result {
            Ok(value) => {
                let _ = tx.send(on_success(value));
            }
            Err(e) if e.is_auth_failure() => {
                warn!(request = label, error = %e, "Session rejected");
                client.set_tokens(None);
                let _ = tx.send(Action::AuthExpired(SESSION_EXPIRED.to_string()));
            }
            Err(e) => {
                error!(request = label, error = %e, "Request failed");
                let _ = tx.send(on_failure(format!("{} failed: {}", label, e)));
            }
        }
    });
}

fn spawn_side_effect(
    effect: SideEffect,
    client: &ApiClient,
    session_store: &Option<SessionStore>,
    action_tx: &mpsc::UnboundedSender<Action>,
    semaphore: &Arc<Semaphore>,
) {
    match effect {
        SideEffect::Login { username, password } => {
            let client = client.clone();
            let tx = action_tx.clone();
            let sem = semaphore.clone();

            tokio::spawn(async move {
                let _permit = sem.acquire().await;
                debug!(username = %username, "Logging in");
                match client.login(&username, &password).await {
                    Ok(login) => {
                        info!(username = %login.user.username, "Login succeeded");
                        let session = Session {
                            tokens: login.tokens,
                            user: login.user,
                        };
                        let _ = tx.send(Action::DataLoaded(DataPayload::LoggedIn(session)));
                    }
                    Err(e) => {
                        warn!(username = %username, error = %e, "Login failed");
                        let _ = tx.send(Action::LoadError(format!("Login failed: {}", e)));
                    }
                }
            });
        }
        SideEffect::FetchDirectory => spawn_request(
            "Loading companies",
            client,
            action_tx,
            semaphore,
            |c| async move { futures::try_join!(c.list_companies(), c.list_departments()) },
            |(companies, departments)| {
                Action::DataLoaded(DataPayload::Directory {
                    companies,
                    departments,
                })
            },
            Action::LoadError,
        ),
        SideEffect::Register(signup) => {
            let client = client.clone();
            let tx = action_tx.clone();

            tokio::spawn(async move {
                match client.register(&signup).await {
                    Ok(message) => {
                        info!(username = %signup.username, "Account registered");
                        let _ = tx.send(Action::DataLoaded(DataPayload::Registered(message)));
                    }
                    Err(e) => {
                        warn!(username = %signup.username, error = %e, "Registration failed");
                        let _ = tx.send(Action::LoadError(format!("Sign up failed: {}", e)));
                    }
                }
            });
        }
        SideEffect::RequestPasswordReset(reset) => {
            let client = client.clone();
            let tx = action_tx.clone();

            tokio::spawn(async move {
                match client.request_password_reset(&reset).await {
                    Ok(message) => {
                        let _ = tx.send(Action::DataLoaded(DataPayload::ResetRequested(message)));
                    }
                    Err(e) => {
                        error!(error = %e, "Password reset request failed");
                        let _ = tx.send(Action::LoadError(format!(
                            "Password reset request failed: {}",
                            e
                        )));
                    }
                }
            });
        }
        SideEffect::RestoreSession => spawn_request(
            "Session check",
            client,
            action_tx,
            semaphore,
            |c| async move { c.fetch_me().await },
            |user| Action::DataLoaded(DataPayload::SessionRestored(user)),
            Action::SessionCheckFailed,
        ),
        SideEffect::Logout => {
            if let Some(tokens) = end_local_session(client, session_store.as_ref()) {
                let client = client.clone();
                tokio::spawn(async move {
                    if let Err(e) = client.logout(&tokens).await {
                        warn!(error = %e, "Server logout failed");
                    }
                });
            }
            info!("Logged out");
        }
        SideEffect::PersistSession(session) => {
            if let Some(store) = session_store
                && let Err(e) = store.save(&session)
            {
                error!(error = %e, "Failed to save session");
            }
        }
        SideEffect::ClearSession => {
            client.set_tokens(None);
            if let Some(store) = session_store
                && let Err(e) = store.clear()
            {
                error!(error = %e, "Failed to clear session");
            }
        }
        SideEffect::Search(query) => spawn_request(
            "Patent search",
            client,
            action_tx,
            semaphore,
            {
                let query = query.clone();
                move |c| async move { c.search_patents(&query).await }
            },
            move |page| Action::DataLoaded(DataPayload::SearchResults { query, page }),
            Action::LoadError,
        ),
        SideEffect::RecordSearch {
            query,
            results_count,
        } => {
            let client = client.clone();
            tokio::spawn(async move {
                // History is best effort; a failure here never reaches the user.
                if let Err(e) = client.record_search(&query, results_count).await {
                    warn!(error = %e, "Failed to record search history");
                }
            });
        }
        SideEffect::SendChat {
            request,
            generation,
        } => spawn_request(
            "Chat",
            client,
            action_tx,
            semaphore,
            move |c| async move { c.send_chat(&request).await },
            move |reply| Action::DataLoaded(DataPayload::ChatReply { generation, reply }),
            move |message| Action::DataLoaded(DataPayload::ChatFailed { generation, message }),
        ),
        SideEffect::LoadAttachment(path) => {
            let tx = action_tx.clone();
            tokio::spawn(async move {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                match tokio::fs::read(&path).await {
                    Ok(bytes) => {
                        debug!(file = %name, bytes = bytes.len(), "Attachment loaded");
                        let content = String::from_utf8_lossy(&bytes).into_owned();
                        let _ = tx.send(Action::DataLoaded(DataPayload::AttachmentLoaded {
                            name,
                            content,
                        }));
                    }
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "Failed to read attachment");
                        let _ = tx.send(Action::LoadError(format!(
                            "Could not read {}: {}",
                            path.display(),
                            e
                        )));
                    }
                }
            });
        }
        SideEffect::FetchHistory(scope) => spawn_request(
            "Loading history",
            client,
            action_tx,
            semaphore,
            move |c| async move { c.list_history(scope).await },
            move |entries| Action::DataLoaded(DataPayload::History { scope, entries }),
            Action::LoadError,
        ),
        SideEffect::DeleteHistory(history_id) => spawn_request(
            "Deleting history entry",
            client,
            action_tx,
            semaphore,
            {
                let history_id = history_id.clone();
                move |c| async move { c.delete_history(&history_id).await }
            },
            move |()| Action::DataLoaded(DataPayload::HistoryDeleted(history_id)),
            Action::LoadError,
        ),
        SideEffect::FetchAdminRequests => spawn_request(
            "Loading admin requests",
            client,
            action_tx,
            semaphore,
            |c| async move { c.list_admin_requests(None, None).await },
            |requests| Action::DataLoaded(DataPayload::AdminRequests(requests)),
            Action::LoadError,
        ),
        SideEffect::FetchPasswordResets => spawn_request(
            "Loading password resets",
            client,
            action_tx,
            semaphore,
            |c| async move { c.list_password_resets().await },
            |resets| Action::DataLoaded(DataPayload::PasswordResets(resets)),
            Action::LoadError,
        ),
        SideEffect::FetchPendingCount(request_type) => {
            let client = client.clone();
            let tx = action_tx.clone();
            let sem = semaphore.clone();

            tokio::spawn(async move {
                let _permit = sem.acquire().await;
                // The badge is advisory; a failed poll keeps the last count.
                match client
                    .list_admin_requests(Some(RequestStatus::Pending), request_type)
                    .await
                {
                    Ok(pending) => {
                        let _ = tx.send(Action::DataLoaded(DataPayload::PendingCount(
                            pending.len(),
                        )));
                    }
                    Err(e) => warn!(error = %e, "Pending request count failed"),
                }
            });
        }
        SideEffect::RequestDeptAdmin { department, note } => spawn_request(
            "Requesting admin role",
            client,
            action_tx,
            semaphore,
            move |c| async move { c.request_dept_admin(department, &note).await },
            |message| Action::DataLoaded(DataPayload::RoleRequested(message)),
            Action::LoadError,
        ),
        SideEffect::FetchUsers(status) => spawn_request(
            "Loading users",
            client,
            action_tx,
            semaphore,
            move |c| async move { c.list_users(status).await },
            |users| Action::DataLoaded(DataPayload::Users(users)),
            Action::LoadError,
        ),
        SideEffect::HandleRequest {
            request_id,
            decision,
            note,
        } => spawn_request(
            "Handling request",
            client,
            action_tx,
            semaphore,
            move |c| async move { c.handle_admin_request(request_id, decision, &note).await },
            move |()| {
                Action::DataLoaded(DataPayload::RequestHandled {
                    request_id,
                    status: decision,
                })
            },
            Action::LoadError,
        ),
        SideEffect::SetUserStatus { user_id, status } => spawn_request(
            "Updating user status",
            client,
            action_tx,
            semaphore,
            {
                let user_id = user_id.clone();
                move |c| async move { c.update_user_status(&user_id, status).await }
            },
            move |()| Action::DataLoaded(DataPayload::UserStatusChanged { user_id, status }),
            Action::LoadError,
        ),
        SideEffect::DeleteUser(user_id) => spawn_request(
            "Deleting user",
            client,
            action_tx,
            semaphore,
            {
                let user_id = user_id.clone();
                move |c| async move { c.delete_user(&user_id).await }
            },
            move |()| Action::DataLoaded(DataPayload::UserDeleted(user_id)),
            Action::LoadError,
        ),
        SideEffect::ResetUserPassword {
            user_id,
            username,
            password,
        } => spawn_request(
            "Resetting password",
            client,
            action_tx,
            semaphore,
            {
                let user_id = user_id.clone();
                move |c| async move { c.reset_user_password(&user_id, &password).await }
            },
            move |()| Action::DataLoaded(DataPayload::UserPasswordReset { user_id, username }),
            Action::LoadError,
        ),
        SideEffect::ChangePassword {
            current,
            new,
            confirm,
        } => spawn_request(
            "Changing password",
            client,
            action_tx,
            semaphore,
            move |c| async move { c.change_password(&current, &new, &confirm).await },
            |()| Action::DataLoaded(DataPayload::PasswordChanged),
            Action::LoadError,
        ),
    }
}

/// Forget the signed-in session locally and return the tokens it held, so
/// the server can be told afterwards. Nothing here waits on the network,
/// which keeps a later login from being cleared by a slow logout.
pub fn end_local_session(client: &ApiClient, store: Option<&SessionStore>) -> Option<Tokens> {
    let tokens = client.tokens();
    client.set_tokens(None);
    if let Some(store) = store
        && let Err(e) = store.clear()
    {
        error!(error = %e, "Failed to clear session");
    }
    tokens
}
