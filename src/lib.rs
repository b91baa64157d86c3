// Patchbay - multi-backend code-improvement pipeline
// Library exports

pub mod config;
pub mod context;
pub mod diff;
pub mod inference;
pub mod patch;
pub mod pipeline;
pub mod prompt;
pub mod vcs;
