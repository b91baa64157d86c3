// Pipeline orchestration
//
// Ties the collaborators together: context → prompt → inference → diff →
// patch, once per backend profile, and reports what happened.

pub mod credentials;
pub mod history;
pub mod orchestrator;
pub mod outcome;

pub use credentials::{CredentialSource, EnvCredentials};
pub use orchestrator::{Orchestrator, PipelineError};
pub use outcome::{ProfileOutcome, ProfileReport, RunReport, RunTally};
