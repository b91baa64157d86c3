// Patch application with quarantine
//
// A diff either applies completely or is written verbatim to the quarantine
// store for manual follow-up. Nothing non-empty is ever discarded.

pub mod applier;
pub mod quarantine;

pub use applier::{PatchApplier, PatchOutcome};
pub use quarantine::{quarantine_file_name, Quarantine, QuarantineEntry};
