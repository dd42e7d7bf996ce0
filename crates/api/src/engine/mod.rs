//! Transactional engines behind the screening and notification endpoints.
//!
//! [`transitions`] runs workflow stage completions, including the seat
//! reservation on enrollment. [`aging`] classifies candidates and writes
//! aging notifications, shared by the timer job and the manual trigger.

pub mod aging;
pub mod transitions;
