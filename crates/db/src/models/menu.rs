//! Menu group and item rows.

use pathway_core::menu::{GroupInfo, MenuEntry};
use pathway_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `menu_groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MenuGroup {
    pub id: DbId,
    pub name: String,
    pub label: String,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

/// A menu item with its required permission code resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MenuItemRow {
    pub id: DbId,
    pub name: String,
    pub label: String,
    pub icon: Option<String>,
    pub path: String,
    pub parent_id: Option<DbId>,
    pub group_id: Option<DbId>,
    pub sort_order: i32,
    pub required_permission: Option<String>,
    pub is_active: bool,
}

impl From<MenuItemRow> for MenuEntry {
    fn from(row: MenuItemRow) -> Self {
        MenuEntry {
            id: row.id,
            name: row.name,
            label: row.label,
            icon: row.icon,
            path: row.path,
            parent_id: row.parent_id,
            group_id: row.group_id,
            sort_order: row.sort_order,
            required_permission: row.required_permission,
        }
    }
}

impl From<MenuGroup> for GroupInfo {
    fn from(group: MenuGroup) -> Self {
        GroupInfo {
            id: group.id,
            name: group.name,
            label: group.label,
            icon: group.icon,
            sort_order: group.sort_order,
        }
    }
}
