//! State and city reference data.

use pathway_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `states` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct State {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// State with the number of cities referencing it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StateView {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub city_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateState {
    pub code: String,
    pub name: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateState {
    pub code: Option<String>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// A row from the `cities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct City {
    pub id: DbId,
    pub name: String,
    pub state_id: DbId,
    pub pincode: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// City joined with its state.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CityView {
    pub id: DbId,
    pub name: String,
    pub state_id: DbId,
    pub state_name: String,
    pub state_code: String,
    pub pincode: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCity {
    pub name: String,
    pub state_id: DbId,
    pub pincode: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCity {
    pub name: Option<String>,
    pub state_id: Option<DbId>,
    pub pincode: Option<String>,
    pub is_active: Option<bool>,
}
