//! User management bindings

use cloudboard_core::{NewUser, UserFilter, UserPatch};

use super::command::{NewUserArgs, UserFields, UserListArgs};
use super::format;
use super::ConsoleResult;
use crate::state::AppState;

pub async fn list(state: &AppState, args: UserListArgs) -> String {
    let query = args.page.query(UserFilter { role: args.role });
    let page = state.users.list(&query).await;
    format::page(&page, format::user_line)
}

pub async fn show(state: &AppState, id: &str) -> ConsoleResult<String> {
    let user = state.users.get(id).await?;
    Ok(format::user_detail(&user))
}

pub async fn create(state: &AppState, args: NewUserArgs) -> ConsoleResult<String> {
    let draft = NewUser {
        email: args.email,
        name: args.name,
        role: args.role.unwrap_or_default(),
        avatar: args.avatar,
    };

    let user = state.users.create(draft).await?;
    Ok(format!("Created user\n{}", format::user_detail(&user)))
}

pub async fn update(state: &AppState, id: &str, fields: UserFields) -> ConsoleResult<String> {
    let patch = UserPatch {
        email: fields.email,
        name: fields.name,
        role: fields.role,
        avatar: fields.avatar,
    };

    let user = state.users.update(id, patch).await?;
    Ok(format!("Updated user\n{}", format::user_detail(&user)))
}

pub async fn delete(state: &AppState, id: &str) -> ConsoleResult<String> {
    state.users.delete(id).await?;
    Ok(format!("Deleted user {id}"))
}
