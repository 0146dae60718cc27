pub mod assignment;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod documents;
pub mod error;
pub mod submission;
pub mod task_filter;
pub mod types;
pub mod wizard;

pub use assignment::{AssignmentDefaults, AssignmentStore};
pub use catalog::TemplateCatalog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigLoader, ConfigValidator, PlantflowConfig};
pub use documents::{DocumentGeneration, GenerationStatus};
pub use error::AppError;
pub use submission::{build_payload, SubmissionPayload};
pub use task_filter::{filter_tasks, ApplicableTask, ConditionPolicy, TaskFilter, TaskKey};
pub use types::*;
pub use wizard::{WizardAction, WizardController, WizardSession, WizardState, WizardStep};
