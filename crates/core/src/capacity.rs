//! Training batch seat accounting.
//!
//! A batch holds `max_capacity` seats of which `current_enrolled` are taken.
//! Every committed change must keep `0 <= current_enrolled <= max_capacity`.

use crate::error::CoreError;
use crate::types::Date;

/// Seat count used when a batch is created without an explicit capacity.
pub const DEFAULT_MAX_CAPACITY: i32 = 30;

/// Seat counters of a single batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatLedger {
    pub max_capacity: i32,
    pub current_enrolled: i32,
}

impl SeatLedger {
    pub fn new(max_capacity: i32, current_enrolled: i32) -> Self {
        Self {
            max_capacity,
            current_enrolled,
        }
    }

    pub fn has_capacity(&self) -> bool {
        self.current_enrolled < self.max_capacity
    }

    /// Remaining seats, clamped at zero.
    pub fn available_slots(&self) -> i32 {
        (self.max_capacity - self.current_enrolled).max(0)
    }

    /// Take one seat.
    pub fn reserve(self) -> Result<Self, CoreError> {
        if !self.has_capacity() {
            return Err(CoreError::CapacityExceeded(format!(
                "Batch is full ({}/{} seats taken)",
                self.current_enrolled, self.max_capacity
            )));
        }
        Ok(Self {
            current_enrolled: self.current_enrolled + 1,
            ..self
        })
    }

    /// Give back one seat. Fails when nothing is enrolled.
    pub fn release(self) -> Result<Self, CoreError> {
        if self.current_enrolled <= 0 {
            return Err(CoreError::Conflict(
                "Batch has no enrolled candidates to release".into(),
            ));
        }
        Ok(Self {
            current_enrolled: self.current_enrolled - 1,
            ..self
        })
    }

    /// Check that `new_max` still fits everyone already enrolled.
    pub fn validate_capacity_change(&self, new_max: i32) -> Result<(), CoreError> {
        validate_max_capacity(new_max)?;
        if new_max < self.current_enrolled {
            return Err(CoreError::Validation(format!(
                "Max capacity ({new_max}) cannot be less than current enrollment ({})",
                self.current_enrolled
            )));
        }
        Ok(())
    }

    /// Occupied batches must be deactivated, not deleted.
    pub fn validate_deletable(&self) -> Result<(), CoreError> {
        if self.current_enrolled > 0 {
            return Err(CoreError::Conflict(format!(
                "Cannot delete batch with {} enrolled candidate(s); deactivate it instead",
                self.current_enrolled
            )));
        }
        Ok(())
    }

    /// Percentage of seats taken, rounded to one decimal place.
    pub fn occupancy_rate(&self) -> f64 {
        occupancy_rate(self.current_enrolled as i64, self.max_capacity as i64)
    }
}

/// Percentage `enrolled / capacity`, one decimal. Zero capacity yields 0.
pub fn occupancy_rate(enrolled: i64, capacity: i64) -> f64 {
    if capacity <= 0 {
        return 0.0;
    }
    let pct = enrolled as f64 * 100.0 / capacity as f64;
    (pct * 10.0).round() / 10.0
}

pub fn validate_max_capacity(max_capacity: i32) -> Result<(), CoreError> {
    if max_capacity < 1 {
        return Err(CoreError::Validation(
            "Max capacity must be at least 1".into(),
        ));
    }
    Ok(())
}

/// A batch may not end before it starts.
pub fn validate_date_range(start: Date, end: Date) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation(format!(
            "End date ({end}) cannot be before start date ({start})"
        )));
    }
    Ok(())
}
