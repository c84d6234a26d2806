//! Console command grammar
//!
//! Each input line is split into words with shell quoting rules and parsed as
//! a multicall command: the first word names the subcommand.

use clap::{Args, Parser, Subcommand};
use cloudboard_core::repository::DEFAULT_PAGE_SIZE;
use cloudboard_core::{ItemStatus, ListQuery, Priority, UserRole};

/// One console line
#[derive(Debug, Parser)]
#[command(multicall = true)]
pub struct ConsoleLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with an existing account
    Login {
        email: String,
        #[arg(allow_hyphen_values = true)]
        password: String,
    },

    /// Create an account and sign in as it
    Register {
        email: String,
        #[arg(allow_hyphen_values = true)]
        password: String,
        /// Display name, defaults to the email
        name: Vec<String>,
    },

    /// Sign out and forget the saved session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Edit the signed-in account's profile
    Profile(ProfileArgs),

    /// List users
    Users(UserListArgs),

    /// Show one user
    User { id: String },

    /// Create a user
    AddUser(NewUserArgs),

    /// Edit a user
    EditUser {
        id: String,
        #[command(flatten)]
        fields: UserFields,
    },

    /// Delete a user
    RmUser { id: String },

    /// List items
    Items(ItemListArgs),

    /// Show one item
    Item { id: String },

    /// Create an item
    AddItem(NewItemArgs),

    /// Edit an item
    EditItem {
        id: String,
        #[command(flatten)]
        fields: ItemFields,
    },

    /// Delete an item
    RmItem { id: String },

    /// List the known item categories
    Categories,

    /// Show dashboard totals
    Stats,

    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

impl Command {
    pub fn needs_session(&self) -> bool {
        !matches!(
            self,
            Command::Quit | Command::Login { .. } | Command::Register { .. } | Command::Categories
        )
    }
}

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Records per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub size: usize,

    /// Case-insensitive search text
    #[arg(short = 'q', long)]
    pub search: Option<String>,
}

impl PageArgs {
    pub fn query<F: Default>(self, filter: F) -> ListQuery<F> {
        let query = ListQuery::new(self.page, self.size).with_filter(filter);
        match self.search {
            Some(search) => query.with_search(search),
            None => query,
        }
    }
}

#[derive(Debug, Args)]
pub struct UserListArgs {
    #[command(flatten)]
    pub page: PageArgs,

    #[arg(long, value_enum)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Args)]
pub struct NewUserArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub name: String,

    /// Defaults to `user`
    #[arg(long, value_enum)]
    pub role: Option<UserRole>,

    #[arg(long)]
    pub avatar: Option<String>,
}

#[derive(Debug, Args)]
pub struct UserFields {
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, value_enum)]
    pub role: Option<UserRole>,

    #[arg(long)]
    pub avatar: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub avatar: Option<String>,
}

#[derive(Debug, Args)]
pub struct ItemListArgs {
    #[command(flatten)]
    pub page: PageArgs,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<ItemStatus>,

    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    /// Author user id
    #[arg(long = "by")]
    pub created_by: Option<String>,
}

#[derive(Debug, Args)]
pub struct NewItemArgs {
    #[arg(long)]
    pub title: String,

    #[command(flatten)]
    pub details: ItemDetails,

    /// Author user id, defaults to the signed-in user
    #[arg(long = "by")]
    pub created_by: Option<String>,
}

#[derive(Debug, Args)]
pub struct ItemFields {
    #[arg(long)]
    pub title: Option<String>,

    #[command(flatten)]
    pub details: ItemDetails,

    /// Author user id
    #[arg(long = "by")]
    pub created_by: Option<String>,
}

/// Optional item attributes shared by create and edit
#[derive(Debug, Args)]
pub struct ItemDetails {
    #[arg(long)]
    pub description: Option<String>,

    /// Free text; see `categories` for the usual ones
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<ItemStatus>,

    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
}
