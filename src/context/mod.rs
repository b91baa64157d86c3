// Repository snapshot used as prompt material
//
// Collected once per run and shared read-only by every profile, so all
// backends see the same tree even if it changes while the run is going.

pub mod collector;

pub use collector::{read_snippet, ContextCollector};

/// Recorded in place of marker-search output when nothing matched.
pub const NO_MARKERS: &str = "(none found)";

/// Immutable repository snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepositoryContext {
    /// Tracked file paths, in version-control order
    pub files: Vec<String>,
    /// Marker-search output, or [`NO_MARKERS`]
    pub markers: String,
    /// `# <path>\n<content>` sections joined by blank lines
    pub snippets: String,
}
