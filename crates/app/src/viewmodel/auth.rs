//! Authentication bindings

use cloudboard_core::UserPatch;

use super::command::ProfileArgs;
use super::format;
use super::ConsoleResult;
use crate::state::AppState;

pub async fn login(state: &AppState, email: &str, password: &str) -> ConsoleResult<String> {
    let identity = state.session.login(email, password).await?;
    Ok(format!("Welcome back, {}", identity.user.name))
}

/// Register and sign in; the display name falls back to the email
pub async fn register(
    state: &AppState,
    email: &str,
    password: &str,
    name: &[String],
) -> ConsoleResult<String> {
    let name = if name.is_empty() {
        email.to_string()
    } else {
        name.join(" ")
    };

    let identity = state.session.register(email, password, &name).await?;
    Ok(format!("Account created, welcome {}", identity.user.name))
}

pub fn logout(state: &AppState) -> String {
    state.session.logout();
    "Signed out".to_string()
}

pub fn whoami(state: &AppState) -> String {
    match state.session.current_user() {
        Some(user) => format::user_detail(&user),
        None => "Not signed in".to_string(),
    }
}

/// Patch the signed-in user's own profile
pub fn profile(state: &AppState, args: ProfileArgs) -> String {
    let patch = UserPatch {
        email: args.email,
        name: args.name,
        avatar: args.avatar,
        role: None,
    };
    if patch.is_empty() {
        return whoami(state);
    }

    match state.session.update_user(patch) {
        Some(user) => format::user_detail(&user),
        None => "Not signed in".to_string(),
    }
}
