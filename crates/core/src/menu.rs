//! Navigation menu assembly.
//!
//! The database returns a flat list of active items. These helpers filter
//! them by the caller's permissions, nest children under parents, and bucket
//! top-level entries by menu group.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::DbId;

/// Synthetic group for items that belong to no group.
pub const OTHER_GROUP_ID: DbId = 0;
pub const OTHER_GROUP_NAME: &str = "other";
pub const OTHER_GROUP_LABEL: &str = "Other";
pub const OTHER_GROUP_SORT: i32 = 999;

/// A flat menu item row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuEntry {
    pub id: DbId,
    pub name: String,
    pub label: String,
    pub icon: Option<String>,
    pub path: String,
    pub parent_id: Option<DbId>,
    pub group_id: Option<DbId>,
    pub sort_order: i32,
    pub required_permission: Option<String>,
}

/// A menu item with nested children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuNode {
    #[serde(flatten)]
    pub entry: MenuEntry,
    pub children: Vec<MenuNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupInfo {
    pub id: DbId,
    pub name: String,
    pub label: String,
    pub icon: Option<String>,
    pub sort_order: i32,
}

impl GroupInfo {
    pub fn other() -> Self {
        Self {
            id: OTHER_GROUP_ID,
            name: OTHER_GROUP_NAME.to_string(),
            label: OTHER_GROUP_LABEL.to_string(),
            icon: None,
            sort_order: OTHER_GROUP_SORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuGroupNode {
    #[serde(flatten)]
    pub group: GroupInfo,
    pub items: Vec<MenuNode>,
}

/// Keep entries the caller may see. `allow` decides whether a required
/// permission is held.
pub fn visible_entries(entries: Vec<MenuEntry>, allow: impl Fn(&str) -> bool) -> Vec<MenuEntry> {
    entries
        .into_iter()
        .filter(|e| e.required_permission.as_deref().is_none_or(|p| allow(p)))
        .collect()
}

/// Nest entries under their parents.
///
/// Entries whose parent is absent from the list (filtered out or inactive)
/// are promoted to the top level. Siblings are ordered by `sort_order`, then
/// id.
pub fn build_tree(entries: Vec<MenuEntry>) -> Vec<MenuNode> {
    let present: std::collections::HashSet<DbId> = entries.iter().map(|e| e.id).collect();
    let mut children_of: HashMap<Option<DbId>, Vec<MenuEntry>> = HashMap::new();
    for entry in entries {
        let key = entry.parent_id.filter(|p| present.contains(p));
        children_of.entry(key).or_default().push(entry);
    }
    attach(None, &mut children_of)
}

fn attach(parent: Option<DbId>, children_of: &mut HashMap<Option<DbId>, Vec<MenuEntry>>) -> Vec<MenuNode> {
    let mut level = children_of.remove(&parent).unwrap_or_default();
    level.sort_by_key(|e| (e.sort_order, e.id));
    level
        .into_iter()
        .map(|entry| {
            let children = attach(Some(entry.id), children_of);
            MenuNode { entry, children }
        })
        .collect()
}

/// Bucket top-level nodes by group, ordered by group sort order.
///
/// Nodes with no group, or an unknown group, land in the "Other" group.
/// Groups with no visible items are omitted.
pub fn group_tree(tree: Vec<MenuNode>, groups: &[GroupInfo]) -> Vec<MenuGroupNode> {
    let known: HashMap<DbId, &GroupInfo> = groups.iter().map(|g| (g.id, g)).collect();
    let mut buckets: HashMap<DbId, Vec<MenuNode>> = HashMap::new();
    for node in tree {
        let gid = node
            .entry
            .group_id
            .filter(|g| known.contains_key(g))
            .unwrap_or(OTHER_GROUP_ID);
        buckets.entry(gid).or_default().push(node);
    }

    let mut result: Vec<MenuGroupNode> = groups
        .iter()
        .filter_map(|g| {
            buckets.remove(&g.id).map(|items| MenuGroupNode {
                group: g.clone(),
                items,
            })
        })
        .collect();
    if let Some(items) = buckets.remove(&OTHER_GROUP_ID) {
        result.push(MenuGroupNode {
            group: GroupInfo::other(),
            items,
        });
    }
    result.sort_by_key(|g| (g.group.sort_order, g.group.id));
    result
}
