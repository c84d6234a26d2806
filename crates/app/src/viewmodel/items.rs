//! Item management bindings

use cloudboard_core::{parse_tags, ItemFilter, ItemPatch, NewItem};

use super::command::{ItemFields, ItemListArgs, NewItemArgs};
use super::format;
use super::ConsoleResult;
use crate::state::AppState;

pub async fn list(state: &AppState, args: ItemListArgs) -> String {
    let filter = ItemFilter {
        category: args.category,
        status: args.status,
        priority: args.priority,
        created_by: args.created_by,
    };

    let page = state.items.list(&args.page.query(filter)).await;
    format::page(&page, format::item_line)
}

pub async fn show(state: &AppState, id: &str) -> ConsoleResult<String> {
    let item = state.items.get(id).await?;
    Ok(format::item_detail(&item))
}

/// Create an item; the author defaults to the signed-in user
pub async fn create(state: &AppState, args: NewItemArgs) -> ConsoleResult<String> {
    let details = args.details;
    let defaults = NewItem::default();

    let draft = NewItem {
        title: args.title,
        description: details.description.unwrap_or(defaults.description),
        category: details.category.unwrap_or(defaults.category),
        status: details.status.unwrap_or(defaults.status),
        priority: details.priority.unwrap_or(defaults.priority),
        tags: details.tags.as_deref().map(parse_tags).unwrap_or_default(),
        created_by: args.created_by.unwrap_or_else(|| {
            state
                .session
                .current_user()
                .map(|u| u.id)
                .unwrap_or_default()
        }),
    };

    let item = state.items.create(draft).await?;
    Ok(format!("Created item\n{}", format::item_detail(&item)))
}

pub async fn update(state: &AppState, id: &str, fields: ItemFields) -> ConsoleResult<String> {
    let details = fields.details;
    let patch = ItemPatch {
        title: fields.title,
        description: details.description,
        category: details.category,
        status: details.status,
        priority: details.priority,
        tags: details.tags.as_deref().map(parse_tags),
        created_by: fields.created_by,
    };

    let item = state.items.update(id, patch).await?;
    Ok(format!("Updated item\n{}", format::item_detail(&item)))
}

pub async fn delete(state: &AppState, id: &str) -> ConsoleResult<String> {
    state.items.delete(id).await?;
    Ok(format!("Deleted item {id}"))
}
