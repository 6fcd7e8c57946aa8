use contracts::system::auth::UserInfo;
use contracts::system::users::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
    /// Session restore still running
    pub restoring: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user_info.is_some()
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.user_info
            .as_ref()
            .map(|u| u.rol.can(permission))
            .unwrap_or(false)
    }
}

async fn restore_session(set_auth_state: WriteSignal<AuthState>) {
    let Some(access_token) = storage::get_access_token() else {
        set_auth_state.set(AuthState::default());
        return;
    };

    match api::get_current_user(&access_token).await {
        Ok(user_info) => {
            log::info!("session restored for {}", user_info.username);
            set_auth_state.set(AuthState {
                access_token: Some(access_token),
                user_info: Some(user_info),
                restoring: false,
            });
            return;
        }
        Err(e) => log::debug!("stored token rejected: {}", e),
    }

    // Token invalid, try refresh
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Ok(response) = api::refresh_token(refresh_token).await {
            storage::save_access_token(&response.access_token);
            if let Ok(user_info) = api::get_current_user(&response.access_token).await {
                set_auth_state.set(AuthState {
                    access_token: Some(response.access_token),
                    user_info: Some(user_info),
                    restoring: false,
                });
                return;
            }
        }
    }

    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}

#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState {
        restoring: true,
        ..AuthState::default()
    });

    // Try to restore session from localStorage on mount
    Effect::new(move |_| {
        spawn_local(restore_session(set_auth_state));
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Reactive permission check for the logged-in user
pub fn use_permission(permission: Permission) -> Signal<bool> {
    let (auth_state, _) = use_auth();
    Signal::derive(move || auth_state.with(|s| s.can(permission)))
}

pub fn use_current_user() -> Signal<Option<UserInfo>> {
    let (auth_state, _) = use_auth();
    Signal::derive(move || auth_state.with(|s| s.user_info.clone()))
}

pub async fn do_login(
    set_auth_state: WriteSignal<AuthState>,
    username: String,
    password: String,
) -> Result<(), String> {
    let response = api::login(username, password).await?;

    storage::save_access_token(&response.access_token);
    storage::save_refresh_token(&response.refresh_token);
    log::info!("logged in as {} ({})", response.user.username, response.user.rol.as_str());

    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user_info: Some(response.user),
        restoring: false,
    });

    Ok(())
}

pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("logout request failed: {}", e);
        }
    }

    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}
