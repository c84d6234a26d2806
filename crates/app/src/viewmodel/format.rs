//! Text rendering for console output

use std::fmt::Write;

use chrono::{DateTime, Utc};
use cloudboard_core::{DashboardStats, Item, Page, User};

const DESCRIPTION_WIDTH: usize = 48;

pub fn date(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

fn date_or(value: Option<&DateTime<Utc>>, fallback: &str) -> String {
    value.map(date).unwrap_or_else(|| fallback.to_string())
}

/// Shorten `text` to `width` characters, marking the cut with "..."
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

pub fn user_line(user: &User) -> String {
    format!(
        "{:<36}  {:<28}  {:<20}  {:<6}  joined {}",
        user.id,
        user.email,
        truncate(&user.name, 20),
        user.role,
        date(&user.created_at)
    )
}

pub fn user_detail(user: &User) -> String {
    format!(
        "id:         {}\nname:       {}\nemail:      {}\nrole:       {}\navatar:     {}\ncreated:    {}\nlast login: {}",
        user.id,
        user.name,
        user.email,
        user.role,
        user.avatar.as_deref().unwrap_or("-"),
        date(&user.created_at),
        date_or(user.last_login.as_ref(), "Never"),
    )
}

pub fn item_line(item: &Item) -> String {
    format!(
        "{:<36}  {:<24}  {:<12}  {:<8}  {:<6}  {}",
        item.id,
        truncate(&item.title, 24),
        item.category,
        item.status,
        item.priority,
        truncate(&item.description, DESCRIPTION_WIDTH)
    )
}

pub fn item_detail(item: &Item) -> String {
    format!(
        "id:          {}\ntitle:       {}\ndescription: {}\ncategory:    {}\nstatus:      {}\npriority:    {}\ntags:        {}\ncreated by:  {}\ncreated:     {}\nupdated:     {}",
        item.id,
        item.title,
        item.description,
        item.category,
        item.status,
        item.priority,
        item.tags.join(", "),
        item.created_by,
        date(&item.created_at),
        date(&item.updated_at),
    )
}

/// A page of rows followed by a position footer
pub fn page<T>(page: &Page<T>, row: impl Fn(&T) -> String) -> String {
    let mut out = String::new();
    for record in &page.items {
        let _ = writeln!(out, "{}", row(record));
    }
    if page.items.is_empty() {
        out.push_str("(no results)\n");
    }
    let _ = write!(
        out,
        "page {}/{} ({} total)",
        page.page,
        page.total_pages.max(1),
        page.total
    );
    out
}

pub fn stats(stats: &DashboardStats) -> String {
    format!(
        "Users: {}\nItems: {}\nActive items: {}",
        stats.total_users, stats.total_items, stats.active_items
    )
}
