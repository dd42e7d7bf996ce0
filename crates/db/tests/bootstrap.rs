use pathway_db::repositories::{MenuRepo, PermissionRepo, RoleRepo};
use sqlx::PgPool;

/// Full bootstrap: connect, migrate, verify seed data.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    pathway_db::health_check(&pool).await.unwrap();

    for table in ["permissions", "roles", "role_permissions", "menu_groups", "menu_items", "onboarding_questions"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert!(count.0 > 0, "{table} should have seed data, got 0 rows");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_super_admin_holds_every_permission(pool: PgPool) {
    let all = PermissionRepo::list(&pool).await.unwrap();
    let role = RoleRepo::find_by_name(&pool, "SUPER_ADMIN").await.unwrap().unwrap();
    let codes = RoleRepo::permission_codes(&pool, role.id).await.unwrap();
    assert_eq!(codes.len(), all.len());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_viewer_permissions(pool: PgPool) {
    let role = RoleRepo::find_by_name(&pool, "VIEWER").await.unwrap().unwrap();
    let codes = RoleRepo::permission_codes(&pool, role.id).await.unwrap();
    assert_eq!(codes, vec!["DASHBOARD_VIEW", "LOCATION_VIEW", "REPORT_VIEW"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_menu_items_resolve_permissions(pool: PgPool) {
    let items = MenuRepo::active_items(&pool).await.unwrap();
    let dashboard = items.iter().find(|i| i.name == "dashboard").unwrap();
    assert_eq!(dashboard.required_permission.as_deref(), Some("DASHBOARD_VIEW"));
    assert!(dashboard.group_id.is_some());

    let groups = MenuRepo::active_groups(&pool).await.unwrap();
    let orders: Vec<i32> = groups.iter().map(|g| g.sort_order).collect();
    let mut sorted = orders.clone();
    sorted.sort();
    assert_eq!(orders, sorted);
}
