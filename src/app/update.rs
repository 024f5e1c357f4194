use std::path::PathBuf;

use tracing::debug;

use crate::api::models::{
    ChatMessage, ChatRequest, HistoryScope, MessageKind, RequestStatus, RequestType, ResetRequest,
    Role, SignupRequest, UserStatus,
};
use crate::app::actions::{Action, DataPayload, SideEffect};
use crate::app::state::{
    AdminTab, AppState, Attachment, BADGE_POLL_TICKS, CHAT_FAILURE_REPLY, ChatPane, ConfirmAction,
    FILE_ONLY_MESSAGE, Field, FocusedPane, LoginMode, Modal, PasswordForm, Screen,
};
use crate::layout::nodes::DIVIDER_HANDLE;
use crate::layout::{Mode, next_left_width, resolve_split_container};
use crate::util::validate::{
    SignupInput, validate_password_change, validate_password_set_admin, validate_signup,
};

const DEPT_ADMIN_NOTE: &str = "Requesting the department admin role";

pub fn update(state: &mut AppState, action: Action) -> Vec<SideEffect> {
    match action {
        Action::Quit => {
            state.should_quit = true;
            vec![]
        }
        Action::Tick => {
            if state.notice_ticks > 0 {
                state.notice_ticks -= 1;
                if state.notice_ticks == 0 {
                    state.notice = None;
                }
            }
            if state.screen == Screen::Login || !state.is_admin() {
                return vec![];
            }
            state.badge_ticks += 1;
            if state.badge_ticks < BADGE_POLL_TICKS {
                return vec![];
            }
            state.badge_ticks = 0;
            pending_count(state).into_iter().collect()
        }
        Action::DismissError => {
            state.error_message = None;
            vec![]
        }

        Action::MoveUp => {
            move_cursor(state, -1);
            vec![]
        }
        Action::MoveDown => {
            move_cursor(state, 1);
            vec![]
        }
        Action::SwitchPane => {
            if state.screen == Screen::Workspace && state.mode == Mode::Split {
                state.focused_pane = match state.focused_pane {
                    FocusedPane::Search => FocusedPane::Chat,
                    FocusedPane::Chat => FocusedPane::Search,
                };
            }
            vec![]
        }
        Action::SwitchTab => switch_tab(state),
        Action::StartEdit(field) => {
            if field == Field::Query {
                reveal_pane(state, FocusedPane::Search);
            } else if field == Field::ChatInput {
                reveal_pane(state, FocusedPane::Chat);
            }
            state.editing = Some(field);
            vec![]
        }
        Action::NextField => {
            let cycle = state.field_cycle();
            if !cycle.is_empty() {
                let next = state
                    .editing
                    .and_then(|f| cycle.iter().position(|c| *c == f))
                    .map(|i| cycle[(i + 1) % cycle.len()])
                    .unwrap_or(cycle[0]);
                state.editing = Some(next);
            }
            vec![]
        }
        Action::Input(ch) => {
            if let Some(field) = state.editing
                && let Some(text) = state.field_mut(field)
            {
                text.push(ch);
            }
            vec![]
        }
        Action::Backspace => {
            if let Some(field) = state.editing
                && let Some(text) = state.field_mut(field)
            {
                text.pop();
            }
            vec![]
        }
        Action::Submit => submit(state),
        Action::PickOption(step) => {
            if state.screen == Screen::Login {
                match state.editing {
                    Some(Field::Company) => state.login.step_company(isize::from(step)),
                    Some(Field::Department) => state.login.step_department(isize::from(step)),
                    _ => {}
                }
            }
            vec![]
        }
        Action::CancelEdit => {
            if state.modal.is_some() {
                state.modal = None;
                state.editing = None;
            } else if state.screen == Screen::Login {
                if state.login.mode != LoginMode::SignIn {
                    return update(state, Action::SetLoginMode(LoginMode::SignIn));
                }
            } else {
                if state.editing == Some(Field::AttachPath) {
                    state.chat.attach_path.clear();
                }
                state.editing = None;
            }
            vec![]
        }

        Action::SetLoginMode(mode) => {
            if state.screen != Screen::Login || state.login.submitting {
                return vec![];
            }
            state.login.mode = mode;
            state.editing = Some(Field::Username);
            if mode != LoginMode::SignIn && !state.login.directory_loaded {
                vec![SideEffect::FetchDirectory]
            } else {
                vec![]
            }
        }
        Action::ShowScreen(screen) => show_screen(state, screen),
        Action::OpenChangePassword => {
            if state.session.is_some() {
                state.modal = Some(Modal::ChangePassword(PasswordForm::default()));
                state.editing = Some(Field::CurrentPassword);
            }
            vec![]
        }
        Action::RequestDeptAdmin => {
            let Some(user) = state.current_user() else {
                return vec![];
            };
            if user.role != Role::User {
                state.set_notice("You already have an admin role");
                return vec![];
            }
            let Some(department) = user.department else {
                state.set_notice("Your account has no department to administer");
                return vec![];
            };
            let department_name = user
                .department_name
                .clone()
                .unwrap_or_else(|| format!("department #{}", department));
            state.modal = Some(Modal::Confirm(ConfirmAction::RequestDeptAdmin {
                department,
                department_name,
            }));
            state.editing = None;
            vec![]
        }
        Action::Logout => {
            let had_session = state.session.take().is_some();
            reset_to_login(state);
            if had_session {
                vec![SideEffect::Logout]
            } else {
                vec![]
            }
        }
        Action::Refresh => match state.screen {
            Screen::History => {
                state.history.loading = true;
                vec![SideEffect::FetchHistory(state.history.scope)]
            }
            Screen::Admin => {
                state.admin.loading = true;
                let mut effects = admin_fetches(state);
                effects.extend(pending_count(state));
                effects
            }
            Screen::Workspace => match state.search.last_query.clone() {
                Some(query) => {
                    state.search.searching = true;
                    vec![SideEffect::Search(query)]
                }
                None => vec![],
            },
            Screen::Login => vec![],
        },

        Action::SetMode(mode) => {
            state.mode = mode;
            if !mode.shows_divider() {
                state.drag.end();
            }
            match mode {
                Mode::Search => state.focused_pane = FocusedPane::Search,
                Mode::Chat => state.focused_pane = FocusedPane::Chat,
                Mode::Split => {}
            }
            vec![]
        }
        Action::ResetLayout => {
            state.width.reset();
            vec![]
        }
        Action::NudgeDivider(direction) => {
            if let Some(container) = resolve_split_container(&state.mounted, Some(DIVIDER_HANDLE)) {
                let delta = f64::from(direction) * f64::from(state.nudge_columns);
                let next = next_left_width(
                    state.width.percent(),
                    delta,
                    state.mounted.width(container),
                    state.width.bounds(),
                );
                state.width.set(next);
            }
            vec![]
        }
        Action::PointerDown { column, row } => {
            pointer_down(state, column, row);
            vec![]
        }
        Action::PointerMove { column } => {
            if let Some(next) =
                state
                    .drag
                    .on_move(f64::from(column), &state.mounted, state.width.bounds())
            {
                state.width.set(next);
            }
            vec![]
        }
        Action::PointerUp | Action::FocusLost => {
            state.drag.end();
            vec![]
        }

        Action::NextPage => turn_page(state, 1),
        Action::PrevPage => turn_page(state, -1),
        Action::CycleSort => {
            state.search.sort = state.search.sort.next();
            state.set_notice(format!("Sort: {}", state.search.sort.as_str()));
            vec![]
        }
        Action::ToggleField(field) => {
            let fields = &mut state.search.fields;
            if let Some(pos) = fields.iter().position(|f| *f == field) {
                if fields.len() > 1 {
                    fields.remove(pos);
                } else {
                    state.set_notice("At least one search field is required");
                }
            } else {
                fields.push(field);
            }
            vec![]
        }
        Action::SendToChat => {
            if let Some(patent) = state.search.selected() {
                let content = format!(
                    "Patent {} sent\nTitle: {}\nApplication date: {}",
                    patent.application_number,
                    patent.title,
                    patent.application_date.as_deref().unwrap_or("-"),
                );
                push_message(state, ChatMessage::new(MessageKind::System, content));
                reveal_pane(state, FocusedPane::Chat);
            }
            vec![]
        }

        Action::NewConversation => {
            let generation = state.chat.generation + 1;
            state.chat = ChatPane {
                generation,
                ..ChatPane::default()
            };
            state.set_notice("Started a new conversation");
            vec![]
        }
        Action::StartAttach => {
            reveal_pane(state, FocusedPane::Chat);
            state.chat.attach_path.clear();
            state.editing = Some(Field::AttachPath);
            vec![]
        }
        Action::ClearAttachment => {
            if state.chat.attachment.take().is_some() {
                state.set_notice("Attachment removed");
            }
            vec![]
        }

        Action::DeleteSelected => delete_history(state),
        Action::RerunSelected => {
            let Some(query) = state.selected_history().map(|h| h.query.clone()) else {
                return vec![];
            };
            state.search.query = query;
            state.screen = Screen::Workspace;
            reveal_pane(state, FocusedPane::Search);
            start_search(state, 1)
        }
        Action::ApproveRequest => handle_request(state, RequestStatus::Approved),
        Action::RejectRequest => handle_request(state, RequestStatus::Rejected),
        Action::ToggleUserStatus => toggle_user_status(state),
        Action::DeleteUser => {
            if let Some((user_id, username)) = managed_user(state, true) {
                state.modal = Some(Modal::Confirm(ConfirmAction::DeleteUser { user_id, username }));
            }
            vec![]
        }
        Action::ResetUserPassword => {
            if state.admin.tab == AdminTab::Resets {
                open_reset_for_request(state);
            } else if let Some((user_id, username)) = managed_user(state, false) {
                state.modal = Some(Modal::ResetPassword {
                    user_id,
                    username,
                    form: PasswordForm::default(),
                });
                state.editing = Some(Field::NewPassword);
            }
            vec![]
        }
        Action::CycleStatusFilter => {
            state.admin.status_filter = match state.admin.status_filter {
                None => Some(UserStatus::Active),
                Some(UserStatus::Active) => Some(UserStatus::Pending),
                Some(UserStatus::Pending) => Some(UserStatus::Suspended),
                Some(UserStatus::Suspended) => None,
            };
            state.admin.loading = true;
            vec![SideEffect::FetchUsers(state.admin.status_filter)]
        }
        Action::Confirm(accepted) => {
            let Some(Modal::Confirm(confirm)) = state.modal.take() else {
                return vec![];
            };
            if !accepted {
                return vec![];
            }
            match confirm {
                ConfirmAction::DeleteUser { user_id, .. } => vec![SideEffect::DeleteUser(user_id)],
                ConfirmAction::RequestDeptAdmin { department, .. } => {
                    vec![SideEffect::RequestDeptAdmin {
                        department,
                        note: DEPT_ADMIN_NOTE.to_string(),
                    }]
                }
            }
        }

        Action::DataLoaded(payload) => data_loaded(state, payload),
        Action::LoadError(msg) => {
            state.drag.end();
            state.login.submitting = false;
            state.search.searching = false;
            state.history.loading = false;
            state.admin.loading = false;
            state.error_message = Some(msg);
            vec![]
        }
        Action::AuthExpired(msg) | Action::SessionCheckFailed(msg) => {
            let had_session = state.session.take().is_some();
            reset_to_login(state);
            state.error_message = Some(msg);
            if had_session {
                vec![SideEffect::ClearSession]
            } else {
                vec![]
            }
        }
    }
}

fn data_loaded(state: &mut AppState, payload: DataPayload) -> Vec<SideEffect> {
    match payload {
        DataPayload::LoggedIn(session) => {
            state.login.submitting = false;
            state.login.clear_entries();
            state.editing = None;
            state.screen = Screen::Workspace;
            state.set_notice(format!("Logged in as {}", session.user.username));
            state.session = Some(session.clone());
            let mut effects = vec![SideEffect::PersistSession(session)];
            effects.extend(pending_count(state));
            effects
        }
        DataPayload::SessionRestored(user) => match state.session.as_mut() {
            Some(session) => {
                session.user = user;
                let mut effects = vec![SideEffect::PersistSession(session.clone())];
                effects.extend(pending_count(state));
                effects
            }
            None => vec![],
        },
        DataPayload::TokensRefreshed(tokens) => match state.session.as_mut() {
            Some(session) if session.tokens != tokens => {
                session.tokens = tokens;
                vec![SideEffect::PersistSession(session.clone())]
            }
            _ => vec![],
        },
        DataPayload::Directory {
            companies,
            departments,
        } => {
            let login = &mut state.login;
            login.companies = companies;
            login.departments = departments;
            login.directory_loaded = true;
            vec![]
        }
        DataPayload::Registered(message) => {
            state.login.submitting = false;
            state.login.clear_entries();
            state.login.mode = LoginMode::SignIn;
            state.editing = Some(Field::Password);
            state.set_notice(message);
            vec![]
        }
        DataPayload::SearchResults { query, page } => {
            if state.search.last_query.as_ref() != Some(&query) {
                return vec![];
            }
            let search = &mut state.search;
            search.searching = false;
            search.results = page.results;
            search.current_page = page.current_page.max(1);
            search.total_pages = page.total_pages;
            search.total_count = page.total_count;
            search.cursor = 0;
            if query.page == 1 {
                vec![SideEffect::RecordSearch {
                    query: query.keyword,
                    results_count: page.total_count,
                }]
            } else {
                vec![]
            }
        }
        DataPayload::ChatReply { generation, reply } => {
            if generation != state.chat.generation {
                debug!(generation, "Dropping reply to an earlier conversation");
                return vec![];
            }
            state.chat.typing = false;
            if state.chat.conversation_id.is_none() {
                state.chat.conversation_id = Some(reply.conversation_id);
            }
            push_message(
                state,
                ChatMessage::new(MessageKind::Ai, reply.ai_message.content),
            );
            vec![]
        }
        DataPayload::ChatFailed {
            generation,
            message,
        } => {
            if generation != state.chat.generation {
                return vec![];
            }
            debug!(error = %message, "Chat reply failed");
            state.chat.typing = false;
            push_message(state, ChatMessage::new(MessageKind::Ai, CHAT_FAILURE_REPLY));
            vec![]
        }
        DataPayload::AttachmentLoaded { name, content } => {
            state.set_notice(format!("Attached {}", name));
            state.chat.attachment = Some(Attachment { name, content });
            vec![]
        }
        DataPayload::History { scope, entries } => {
            if scope == state.history.scope {
                state.history.entries = entries;
                state.history.loading = false;
                clamp_cursor(&mut state.history.cursor, state.history.entries.len());
            }
            vec![]
        }
        DataPayload::HistoryDeleted(id) => {
            state.history.entries.retain(|h| h.history_id != id);
            clamp_cursor(&mut state.history.cursor, state.history.entries.len());
            state.set_notice("History entry deleted");
            vec![]
        }
        DataPayload::AdminRequests(requests) => {
            state.admin.requests = requests;
            state.admin.loading = false;
            let rows = state.admin.row_count();
            clamp_cursor(&mut state.admin.cursor, rows);
            vec![]
        }
        DataPayload::PasswordResets(resets) => {
            state.admin.resets = resets;
            state.admin.loading = false;
            let rows = state.admin.row_count();
            clamp_cursor(&mut state.admin.cursor, rows);
            vec![]
        }
        DataPayload::PendingCount(count) => {
            state.pending_badge = count;
            vec![]
        }
        DataPayload::Users(users) => {
            state.admin.users = users;
            state.admin.loading = false;
            let rows = state.admin.row_count();
            clamp_cursor(&mut state.admin.cursor, rows);
            vec![]
        }
        DataPayload::RequestHandled { request_id, status } => {
            let admin = &mut state.admin;
            for req in admin.requests.iter_mut().chain(admin.resets.iter_mut()) {
                if req.request_id == request_id {
                    req.status = status;
                }
            }
            state.set_notice(format!("Request #{} {}", request_id, status.as_str()));
            pending_count(state).into_iter().collect()
        }
        DataPayload::UserStatusChanged { user_id, status } => {
            if let Some(user) = state.admin.users.iter_mut().find(|u| u.user_id == user_id) {
                user.status = status;
                let name = user.username.clone();
                state.set_notice(format!("{} is now {}", name, status.as_str()));
            }
            vec![]
        }
        DataPayload::UserDeleted(user_id) => {
            state.admin.users.retain(|u| u.user_id != user_id);
            let rows = state.admin.row_count();
            clamp_cursor(&mut state.admin.cursor, rows);
            state.set_notice("User deleted");
            vec![]
        }
        DataPayload::UserPasswordReset { user_id, username } => {
            state.admin.settle_resets(&user_id);
            state.set_notice(format!("Password reset for {}", username));
            pending_count(state).into_iter().collect()
        }
        DataPayload::PasswordChanged => {
            state.set_notice("Password changed");
            vec![]
        }
        DataPayload::ResetRequested(message) => {
            state.login.submitting = false;
            state.login.clear_entries();
            state.login.mode = LoginMode::SignIn;
            state.editing = Some(Field::Username);
            state.set_notice(message);
            vec![]
        }
        DataPayload::RoleRequested(message) => {
            state.set_notice(message);
            vec![]
        }
    }
}

fn submit(state: &mut AppState) -> Vec<SideEffect> {
    if state.modal.is_some() {
        return submit_modal(state);
    }

    match (state.screen, state.editing) {
        (Screen::Login, _) => submit_login(state),
        (_, Some(Field::Query)) => {
            state.editing = None;
            start_search(state, 1)
        }
        (_, Some(Field::ChatInput)) => send_chat(state),
        (_, Some(Field::AttachPath)) => {
            state.editing = Some(Field::ChatInput);
            let path = state.chat.attach_path.trim().to_string();
            state.chat.attach_path.clear();
            if path.is_empty() {
                return vec![];
            }
            vec![SideEffect::LoadAttachment(PathBuf::from(path))]
        }
        (Screen::Workspace, None) => match state.focused_pane {
            FocusedPane::Search => update(state, Action::SendToChat),
            FocusedPane::Chat => {
                state.editing = Some(Field::ChatInput);
                vec![]
            }
        },
        (Screen::History, None) => update(state, Action::RerunSelected),
        _ => vec![],
    }
}

fn submit_login(state: &mut AppState) -> Vec<SideEffect> {
    if state.login.submitting {
        return vec![];
    }
    match state.login.mode {
        LoginMode::SignIn => {}
        LoginMode::SignUp => return submit_signup(state),
        LoginMode::Reset => return request_password_reset(state),
    }
    let username = state.login.username.trim().to_string();
    let password = state.login.password.clone();
    if username.is_empty() || password.is_empty() {
        state.set_notice("Enter username and password");
        return vec![];
    }
    state.login.submitting = true;
    vec![SideEffect::Login { username, password }]
}

fn submit_signup(state: &mut AppState) -> Vec<SideEffect> {
    let login = &state.login;
    let username = login.username.trim().to_string();
    let email = login.email.trim().to_string();
    let input = SignupInput {
        username: &username,
        email: &email,
        password: &login.password,
        confirm: &login.confirm,
        company: login.company,
        department: login.department,
    };
    if let Err(e) = validate_signup(&input) {
        state.set_notice(e.to_string());
        return vec![];
    }
    let (Some(company), Some(department)) = (login.company, login.department) else {
        return vec![];
    };
    let signup = SignupRequest {
        username,
        email,
        password: login.password.clone(),
        password_confirm: login.confirm.clone(),
        first_name: login.first_name.trim().to_string(),
        last_name: login.last_name.trim().to_string(),
        company,
        department,
    };
    state.login.submitting = true;
    vec![SideEffect::Register(signup)]
}

/// Anonymous reset request from the login screen.
fn request_password_reset(state: &mut AppState) -> Vec<SideEffect> {
    let login = &state.login;
    let username = login.username.trim().to_string();
    let email = login.email.trim().to_string();
    let missing = if username.is_empty() {
        Some(Field::Username)
    } else if email.is_empty() {
        Some(Field::Email)
    } else if login.company.is_none() {
        Some(Field::Company)
    } else if login.department.is_none() {
        Some(Field::Department)
    } else {
        None
    };
    let (None, Some(company), Some(department)) = (missing, login.company, login.department)
    else {
        state.set_notice("Enter username, email, company and department to request a reset");
        state.editing = missing;
        return vec![];
    };
    state.login.submitting = true;
    vec![SideEffect::RequestPasswordReset(ResetRequest {
        username,
        email,
        company,
        department,
    })]
}

fn submit_modal(state: &mut AppState) -> Vec<SideEffect> {
    let Some(modal) = state.modal.as_mut() else {
        return vec![];
    };

    match modal {
        Modal::ChangePassword(form) => {
            match validate_password_change(&form.current, &form.new, &form.confirm) {
                Ok(()) => {
                    let effect = SideEffect::ChangePassword {
                        current: form.current.clone(),
                        new: form.new.clone(),
                        confirm: form.confirm.clone(),
                    };
                    state.modal = None;
                    state.editing = None;
                    vec![effect]
                }
                Err(e) => {
                    form.error = Some(e.to_string());
                    vec![]
                }
            }
        }
        Modal::ResetPassword {
            user_id,
            username,
            form,
        } => match validate_password_set_admin(&form.new, &form.confirm) {
            Ok(()) => {
                let effect = SideEffect::ResetUserPassword {
                    user_id: user_id.clone(),
                    username: username.clone(),
                    password: form.new.clone(),
                };
                state.modal = None;
                state.editing = None;
                vec![effect]
            }
            Err(e) => {
                form.error = Some(e.to_string());
                vec![]
            }
        },
        Modal::Confirm(_) => update(state, Action::Confirm(true)),
    }
}

fn start_search(state: &mut AppState, page: u32) -> Vec<SideEffect> {
    let query = state.search.build_query(page);
    if query.keyword.is_empty() {
        state.set_notice("Enter a search keyword");
        return vec![];
    }
    state.search.searching = true;
    state.search.last_query = Some(query.clone());
    vec![SideEffect::Search(query)]
}

fn turn_page(state: &mut AppState, step: i32) -> Vec<SideEffect> {
    let Some(last) = state.search.last_query.clone() else {
        return vec![];
    };
    if state.search.searching {
        return vec![];
    }
    let target = i64::from(state.search.current_page) + i64::from(step);
    if target < 1 || target > i64::from(state.search.total_pages) {
        return vec![];
    }
    let query = crate::api::models::SearchQuery {
        page: target as u32,
        ..last
    };
    state.search.searching = true;
    state.search.last_query = Some(query.clone());
    vec![SideEffect::Search(query)]
}

fn send_chat(state: &mut AppState) -> Vec<SideEffect> {
    let text = state.chat.input.trim().to_string();
    if (text.is_empty() && state.chat.attachment.is_none()) || state.chat.typing {
        return vec![];
    }

    let attachment = state.chat.attachment.take();
    let message = if text.is_empty() {
        FILE_ONLY_MESSAGE.to_string()
    } else {
        text
    };

    push_message(
        state,
        ChatMessage {
            kind: MessageKind::User,
            content: message.clone(),
            file_name: attachment.as_ref().map(|a| a.name.clone()),
        },
    );
    state.chat.input.clear();
    state.chat.typing = true;

    let (file_name, file_content) = match attachment {
        Some(a) => (Some(a.name), Some(a.content)),
        None => (None, None),
    };

    vec![SideEffect::SendChat {
        request: ChatRequest {
            message,
            conversation_id: state.chat.conversation_id.clone(),
            file_content,
            file_name,
        },
        generation: state.chat.generation,
    }]
}

fn show_screen(state: &mut AppState, screen: Screen) -> Vec<SideEffect> {
    if state.session.is_none() {
        return vec![];
    }
    state.editing = None;
    state.drag.end();
    match screen {
        Screen::Login => vec![],
        Screen::Workspace => {
            state.screen = Screen::Workspace;
            vec![]
        }
        Screen::History => {
            state.screen = Screen::History;
            state.history.loading = true;
            vec![SideEffect::FetchHistory(state.history.scope)]
        }
        Screen::Admin => {
            if !state.is_admin() {
                state.set_notice("The admin console requires an admin role");
                return vec![];
            }
            state.screen = Screen::Admin;
            state.admin.loading = true;
            admin_fetches(state)
        }
    }
}

fn admin_fetches(state: &AppState) -> Vec<SideEffect> {
    vec![
        SideEffect::FetchAdminRequests,
        SideEffect::FetchPasswordResets,
        SideEffect::FetchUsers(state.admin.status_filter),
    ]
}

/// Badge refresh for the signed-in admin. Super admins see every pending
/// request; department admins only password resets.
fn pending_count(state: &AppState) -> Option<SideEffect> {
    match state.role()? {
        Role::SuperAdmin => Some(SideEffect::FetchPendingCount(None)),
        Role::DeptAdmin => Some(SideEffect::FetchPendingCount(Some(
            RequestType::PasswordReset,
        ))),
        Role::User => None,
    }
}

fn switch_tab(state: &mut AppState) -> Vec<SideEffect> {
    match state.screen {
        Screen::History => {
            state.history.scope = match state.history.scope {
                HistoryScope::Shared => HistoryScope::Mine,
                HistoryScope::Mine => HistoryScope::Shared,
            };
            state.history.entries.clear();
            state.history.cursor = 0;
            state.history.loading = true;
            vec![SideEffect::FetchHistory(state.history.scope)]
        }
        Screen::Admin => {
            state.admin.tab = match state.admin.tab {
                AdminTab::Requests => AdminTab::Resets,
                AdminTab::Resets => AdminTab::Users,
                AdminTab::Users => AdminTab::Requests,
            };
            state.admin.cursor = 0;
            vec![]
        }
        _ => vec![],
    }
}

fn pointer_down(state: &mut AppState, column: u16, row: u16) {
    use crate::layout::nodes::{CHAT_PANE, SEARCH_PANE};

    if state.screen != Screen::Workspace || state.modal.is_some() {
        return;
    }
    if state.mode.shows_divider() && state.mounted.hit(DIVIDER_HANDLE, column, row) {
        state
            .drag
            .begin(f64::from(column), state.width.percent(), DIVIDER_HANDLE);
        return;
    }
    if state.mounted.hit(SEARCH_PANE, column, row) {
        state.focused_pane = FocusedPane::Search;
    } else if state.mounted.hit(CHAT_PANE, column, row) {
        state.focused_pane = FocusedPane::Chat;
    }
}

fn delete_history(state: &mut AppState) -> Vec<SideEffect> {
    if state.screen != Screen::History {
        return vec![];
    }
    let Some(entry) = state.selected_history() else {
        return vec![];
    };
    let own = match (entry.created_by.as_deref(), state.current_user()) {
        (Some(owner), Some(user)) => owner == user.user_id,
        _ => false,
    };
    if !own {
        state.set_notice("Only entries you created can be deleted");
        return vec![];
    }
    vec![SideEffect::DeleteHistory(entry.history_id.clone())]
}

fn handle_request(state: &mut AppState, decision: RequestStatus) -> Vec<SideEffect> {
    if state.screen != Screen::Admin {
        return vec![];
    }
    let Some(request) = state.selected_request() else {
        return vec![];
    };
    if request.status != RequestStatus::Pending {
        state.set_notice("Request has already been handled");
        return vec![];
    }
    // Approving a reset means issuing a temporary password.
    if decision == RequestStatus::Approved && request.request_type == RequestType::PasswordReset {
        open_reset_for_request(state);
        return vec![];
    }
    let request_id = request.request_id;
    vec![SideEffect::HandleRequest {
        request_id,
        decision,
        note: decision_note(state, decision),
    }]
}

/// Note recorded with a decision, naming the deciding role.
fn decision_note(state: &AppState, decision: RequestStatus) -> String {
    let verb = match decision {
        RequestStatus::Rejected => "Rejected",
        _ => "Approved",
    };
    let role = state.role().map(Role::label).unwrap_or("admin");
    format!("{} by {}", verb, role)
}

/// Temporary password modal for the user behind the selected reset request.
fn open_reset_for_request(state: &mut AppState) {
    let Some(request) = state.selected_request() else {
        return;
    };
    if request.status != RequestStatus::Pending {
        state.set_notice("Request has already been handled");
        return;
    }
    let Some(user_id) = request.user.clone() else {
        state.set_notice("This request names no user");
        return;
    };
    let username = request.user_name.clone().unwrap_or_else(|| user_id.clone());
    state.modal = Some(Modal::ResetPassword {
        user_id,
        username,
        form: PasswordForm::default(),
    });
    state.editing = Some(Field::NewPassword);
}

fn toggle_user_status(state: &mut AppState) -> Vec<SideEffect> {
    let Some((user_id, _)) = managed_user(state, true) else {
        return vec![];
    };
    let Some(current) = state.selected_user().map(|u| u.status) else {
        return vec![];
    };
    let status = match current {
        UserStatus::Active => UserStatus::Suspended,
        UserStatus::Pending | UserStatus::Suspended => UserStatus::Active,
    };
    vec![SideEffect::SetUserStatus { user_id, status }]
}

/// Selected user on the admin Users tab that the current admin may act on.
/// `super_only` restricts the operation to super admins.
fn managed_user(state: &mut AppState, super_only: bool) -> Option<(String, String)> {
    if state.screen != Screen::Admin {
        return None;
    }
    let (user_id, username) = state
        .selected_user()
        .map(|u| (u.user_id.clone(), u.username.clone()))?;

    if super_only && !state.is_super_admin() {
        state.set_notice("Only a super admin can do that");
        return None;
    }
    if state.current_user().is_some_and(|me| me.user_id == user_id) {
        state.set_notice("You can't do that to your own account");
        return None;
    }
    Some((user_id, username))
}

fn move_cursor(state: &mut AppState, step: isize) {
    match state.screen {
        Screen::Workspace => match state.focused_pane {
            FocusedPane::Search => {
                let len = state.search.results.len();
                step_cursor(&mut state.search.cursor, len, step);
            }
            FocusedPane::Chat => {
                state.chat.scroll = if step < 0 {
                    state.chat.scroll.saturating_add(1)
                } else {
                    state.chat.scroll.saturating_sub(1)
                };
            }
        },
        Screen::History => {
            let len = state.history.entries.len();
            step_cursor(&mut state.history.cursor, len, step);
        }
        Screen::Admin => {
            let len = state.admin.row_count();
            step_cursor(&mut state.admin.cursor, len, step);
        }
        Screen::Login => {}
    }
}

fn step_cursor(cursor: &mut usize, len: usize, step: isize) {
    if len == 0 {
        *cursor = 0;
        return;
    }
    let next = (*cursor as isize + step).clamp(0, len as isize - 1);
    *cursor = next as usize;
}

fn clamp_cursor(cursor: &mut usize, len: usize) {
    if len == 0 {
        *cursor = 0;
    } else if *cursor >= len {
        *cursor = len - 1;
    }
}

/// Make `pane` visible and focused; search-only or chat-only modes fall back
/// to split when the other pane is asked for.
fn reveal_pane(state: &mut AppState, pane: FocusedPane) {
    let hidden = matches!(
        (state.mode, pane),
        (Mode::Search, FocusedPane::Chat) | (Mode::Chat, FocusedPane::Search)
    );
    if hidden {
        state.mode = Mode::Split;
    }
    state.focused_pane = pane;
}

fn push_message(state: &mut AppState, message: ChatMessage) {
    state.chat.messages.push(message);
    state.chat.scroll = 0;
}

fn reset_to_login(state: &mut AppState) {
    state.screen = Screen::Login;
    state.modal = None;
    state.drag.end();
    state.forget_user_data();
    state.login.clear_entries();
    state.login.mode = LoginMode::SignIn;
    state.login.submitting = false;
    state.editing = Some(Field::Username);
}
