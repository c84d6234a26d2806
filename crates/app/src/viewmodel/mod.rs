//! Console bindings
//!
//! Each input line is parsed into a [`Command`] and dispatched to the auth,
//! users or items bindings. Everything except `login`, `register`,
//! `categories`, `help` and `quit` requires a signed-in session.

mod auth;
mod command;
mod format;
mod items;
mod users;

use clap::error::ErrorKind;
use clap::Parser;
use cloudboard_core::ITEM_CATEGORIES;
use thiserror::Error;

use crate::state::AppState;

pub use command::{Command, ConsoleLine};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("{0}")]
    Usage(String),

    #[error("Please log in first")]
    NotSignedIn,

    #[error(transparent)]
    Core(#[from] cloudboard_core::Error),
}

pub type ConsoleResult<T> = std::result::Result<T, ConsoleError>;

/// What the console loop should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Run one input line against the application state
pub async fn dispatch(state: &AppState, line: &str) -> ConsoleResult<Reply> {
    let words = shlex::split(line)
        .ok_or_else(|| ConsoleError::Usage("Unbalanced quotes".to_string()))?;
    if words.is_empty() {
        return Ok(Reply::Text(String::new()));
    }

    let command = match ConsoleLine::try_parse_from(words) {
        Ok(parsed) => parsed.command,
        Err(e) => return parse_failure(e),
    };

    if command.needs_session() && !state.session.is_authenticated() {
        return Err(ConsoleError::NotSignedIn);
    }

    let text = match command {
        Command::Quit => return Ok(Reply::Quit),
        Command::Login { email, password } => auth::login(state, &email, &password).await?,
        Command::Register {
            email,
            password,
            name,
        } => auth::register(state, &email, &password, &name).await?,
        Command::Logout => auth::logout(state),
        Command::Whoami => auth::whoami(state),
        Command::Profile(args) => auth::profile(state, args),
        Command::Users(args) => users::list(state, args).await,
        Command::User { id } => users::show(state, &id).await?,
        Command::AddUser(args) => users::create(state, args).await?,
        Command::EditUser { id, fields } => users::update(state, &id, fields).await?,
        Command::RmUser { id } => users::delete(state, &id).await?,
        Command::Items(args) => items::list(state, args).await,
        Command::Item { id } => items::show(state, &id).await?,
        Command::AddItem(args) => items::create(state, args).await?,
        Command::EditItem { id, fields } => items::update(state, &id, fields).await?,
        Command::RmItem { id } => items::delete(state, &id).await?,
        Command::Categories => ITEM_CATEGORIES.join("\n"),
        Command::Stats => {
            let stats = cloudboard_core::dashboard_stats(&state.users, &state.items).await;
            format::stats(&stats)
        }
    };

    Ok(Reply::Text(text))
}

/// Help output is a reply; anything else clap rejects is a usage error
fn parse_failure(e: clap::Error) -> ConsoleResult<Reply> {
    let rendered = e.render().to_string();
    match e.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        | ErrorKind::DisplayVersion => Ok(Reply::Text(rendered.trim_end().to_string())),
        _ => Err(ConsoleError::Usage(
            rendered
                .trim_start_matches("error: ")
                .trim_end()
                .to_string(),
        )),
    }
}
