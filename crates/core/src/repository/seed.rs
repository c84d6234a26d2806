//! Seed records loaded at startup

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Item, ItemStatus, Priority, User, UserRole};

const AVATAR_ADMIN: &str =
    "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg?auto=compress&cs=tinysrgb&w=150";
const AVATAR_USER: &str =
    "https://images.pexels.com/photos/415829/pexels-photo-415829.jpeg?auto=compress&cs=tinysrgb&w=150";
const AVATAR_VIEWER: &str =
    "https://images.pexels.com/photos/1239291/pexels-photo-1239291.jpeg?auto=compress&cs=tinysrgb&w=150";

/// Midnight UTC on the given day of January 2024
fn seed_date(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The three built-in accounts, one per role
pub fn seed_users() -> Vec<User> {
    let now = Utc::now();
    let user = |id: &str, email: &str, name: &str, role, avatar: &str, day| User {
        id: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        role,
        avatar: Some(avatar.to_string()),
        created_at: seed_date(day),
        last_login: Some(now),
    };

    vec![
        user("1", "admin@cloudboard.com", "Admin User", UserRole::Admin, AVATAR_ADMIN, 1),
        user("2", "user@cloudboard.com", "Regular User", UserRole::User, AVATAR_USER, 2),
        user("3", "viewer@cloudboard.com", "Viewer User", UserRole::Viewer, AVATAR_VIEWER, 3),
    ]
}

/// Four sample items spread across categories, statuses and priorities
pub fn seed_items() -> Vec<Item> {
    let item = |id: &str,
                title: &str,
                description: &str,
                category: &str,
                status,
                priority,
                tags: &[&str],
                created_by: &str,
                day| Item {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        status,
        priority,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_by: created_by.to_string(),
        created_at: seed_date(day),
        updated_at: seed_date(day),
    };

    vec![
        item(
            "1",
            "Project Alpha",
            "A revolutionary cloud-based solution for modern businesses",
            "Development",
            ItemStatus::Active,
            Priority::High,
            &["cloud", "business", "innovation"],
            "1",
            1,
        ),
        item(
            "2",
            "Marketing Campaign Q1",
            "Q1 2024 marketing strategy and implementation",
            "Marketing",
            ItemStatus::Pending,
            Priority::Medium,
            &["marketing", "strategy", "Q1"],
            "2",
            2,
        ),
        item(
            "3",
            "Security Audit",
            "Comprehensive security review and vulnerability assessment",
            "Security",
            ItemStatus::Active,
            Priority::High,
            &["security", "audit", "compliance"],
            "1",
            3,
        ),
        item(
            "4",
            "UI/UX Redesign",
            "Complete redesign of the user interface and experience",
            "Design",
            ItemStatus::Inactive,
            Priority::Low,
            &["design", "ui", "ux"],
            "2",
            4,
        ),
    ]
}
