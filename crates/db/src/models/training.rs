//! Training programme and batch models.

use pathway_core::capacity::SeatLedger;
use pathway_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `training_masters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrainingMaster {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub skill_category: Option<String>,
    pub duration_days: Option<i32>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Training master with batch counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrainingMasterView {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub skill_category: Option<String>,
    pub duration_days: Option<i32>,
    pub is_active: bool,
    pub total_batches: i64,
    pub active_batches: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrainingMaster {
    pub name: String,
    pub description: Option<String>,
    pub skill_category: Option<String>,
    pub duration_days: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTrainingMaster {
    pub name: Option<String>,
    pub description: Option<String>,
    pub skill_category: Option<String>,
    pub duration_days: Option<i32>,
    pub is_active: Option<bool>,
}

/// A row from the `training_batches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrainingBatch {
    pub id: DbId,
    pub training_id: DbId,
    pub batch_code: String,
    pub start_date: Date,
    pub end_date: Date,
    pub max_capacity: i32,
    pub current_enrolled: i32,
    pub location: Option<String>,
    pub trainer_name: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TrainingBatch {
    pub fn ledger(&self) -> SeatLedger {
        SeatLedger::new(self.max_capacity, self.current_enrolled)
    }
}

/// Batch joined with its training name and seat figures.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrainingBatchView {
    pub id: DbId,
    pub training_id: DbId,
    pub training_name: String,
    pub batch_code: String,
    pub start_date: Date,
    pub end_date: Date,
    pub max_capacity: i32,
    pub current_enrolled: i32,
    pub available_slots: i32,
    pub has_capacity: bool,
    pub location: Option<String>,
    pub trainer_name: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TrainingBatchView {
    pub fn ledger(&self) -> SeatLedger {
        SeatLedger::new(self.max_capacity, self.current_enrolled)
    }
}

/// Insert payload. `max_capacity` is resolved to its default by the caller.
#[derive(Debug, Clone)]
pub struct CreateTrainingBatch {
    pub training_id: DbId,
    pub batch_code: String,
    pub start_date: Date,
    pub end_date: Date,
    pub max_capacity: i32,
    pub location: Option<String>,
    pub trainer_name: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTrainingBatch {
    pub training_id: Option<DbId>,
    pub batch_code: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub max_capacity: Option<i32>,
    pub location: Option<String>,
    pub trainer_name: Option<String>,
    pub is_active: Option<bool>,
}

/// Filters for the training calendar listing.
#[derive(Debug, Clone, Default)]
pub struct CalendarFilter {
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub training_id: Option<DbId>,
    pub active_only: bool,
}

/// Aggregate seat figures over active batches.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BatchTotals {
    pub total_active_batches: i64,
    pub upcoming_batches: i64,
    pub ongoing_batches: i64,
    pub total_capacity: i64,
    pub total_enrolled: i64,
}
