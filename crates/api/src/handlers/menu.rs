//! Handlers for the `/menu` resource.
//!
//! Visibility is decided per request from the caller's token: an item is
//! shown when it needs no permission or the caller holds the one it names.

use axum::extract::State;
use axum::Json;
use pathway_core::menu::{build_tree, group_tree, visible_entries, GroupInfo, MenuEntry, MenuGroupNode, MenuNode};
use pathway_db::models::menu::{MenuGroup, MenuItemRow};
use pathway_db::repositories::MenuRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSuperAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/menu
///
/// The caller's visible items as a tree.
pub async fn my_menu(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<MenuNode>>>> {
    let entries = visible_for(&state, &auth).await?;
    Ok(Json(DataResponse {
        data: build_tree(entries),
    }))
}

/// GET /api/v1/menu/grouped
///
/// The caller's visible top-level items bucketed by menu group.
pub async fn grouped_menu(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<MenuGroupNode>>>> {
    let entries = visible_for(&state, &auth).await?;
    let groups: Vec<GroupInfo> = MenuRepo::active_groups(&state.pool)
        .await?
        .into_iter()
        .map(GroupInfo::from)
        .collect();
    Ok(Json(DataResponse {
        data: group_tree(build_tree(entries), &groups),
    }))
}

/// GET /api/v1/menu/groups
pub async fn list_groups(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<MenuGroup>>>> {
    let groups = MenuRepo::active_groups(&state.pool).await?;
    Ok(Json(DataResponse { data: groups }))
}

/// GET /api/v1/menu/all
///
/// Every active item, unfiltered. Super admin only.
pub async fn all_items(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> AppResult<Json<DataResponse<Vec<MenuItemRow>>>> {
    let items = MenuRepo::active_items(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

async fn visible_for(state: &AppState, auth: &AuthUser) -> AppResult<Vec<MenuEntry>> {
    let entries: Vec<MenuEntry> = MenuRepo::active_items(&state.pool)
        .await?
        .into_iter()
        .map(MenuEntry::from)
        .collect();
    Ok(visible_entries(entries, |code| auth.has_permission(code)))
}
