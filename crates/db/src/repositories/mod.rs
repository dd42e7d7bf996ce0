//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument, or a `&mut Transaction` for
//! steps that must commit together with other writes.

pub mod admin_user_repo;
pub mod aging_notification_repo;
pub mod candidate_repo;
pub mod city_repo;
pub mod dashboard_repo;
pub mod menu_repo;
pub mod otp_repo;
pub mod profile_repo;
pub mod question_repo;
pub mod role_repo;
pub mod session_repo;
pub mod state_repo;
pub mod training_batch_repo;
pub mod training_master_repo;
pub mod workflow_repo;

pub use admin_user_repo::AdminUserRepo;
pub use aging_notification_repo::AgingNotificationRepo;
pub use candidate_repo::CandidateRepo;
pub use city_repo::CityRepo;
pub use dashboard_repo::DashboardRepo;
pub use menu_repo::MenuRepo;
pub use otp_repo::OtpRepo;
pub use profile_repo::ProfileRepo;
pub use question_repo::{AnswerRepo, QuestionRepo};
pub use role_repo::{PermissionRepo, RoleRepo};
pub use session_repo::SessionRepo;
pub use state_repo::StateRepo;
pub use training_batch_repo::TrainingBatchRepo;
pub use training_master_repo::TrainingMasterRepo;
pub use workflow_repo::WorkflowRepo;
