//! Repository for `menu_groups` and `menu_items`.

use sqlx::PgPool;

use crate::models::menu::{MenuGroup, MenuItemRow};

pub struct MenuRepo;

impl MenuRepo {
    /// Active groups in display order.
    pub async fn active_groups(pool: &PgPool) -> Result<Vec<MenuGroup>, sqlx::Error> {
        sqlx::query_as::<_, MenuGroup>(
            "SELECT id, name, label, icon, sort_order, is_active
             FROM menu_groups
             WHERE is_active = true
             ORDER BY sort_order ASC, id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Active items with their required permission code resolved.
    pub async fn active_items(pool: &PgPool) -> Result<Vec<MenuItemRow>, sqlx::Error> {
        sqlx::query_as::<_, MenuItemRow>(
            "SELECT m.id, m.name, m.label, m.icon, m.path, m.parent_id, m.group_id,
                    m.sort_order, p.code AS required_permission, m.is_active
             FROM menu_items m
             LEFT JOIN permissions p ON p.id = m.permission_id
             WHERE m.is_active = true
             ORDER BY m.sort_order ASC, m.id ASC",
        )
        .fetch_all(pool)
        .await
    }
}
