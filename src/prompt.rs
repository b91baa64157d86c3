// Prompt composition
//
// Pure function of (responsibility, snapshot). Identical inputs always give
// byte-identical prompts.

use crate::context::{RepositoryContext, NO_MARKERS};

/// Placeholder for an empty snippet bundle.
pub const NO_SNIPPETS: &str = "(no snippets)";

/// Compose the user prompt for a backend specialising in `responsibility`.
pub fn compose(responsibility: &str, context: &RepositoryContext) -> String {
    let file_list = context.files.join("\n");
    let markers = if context.markers.trim().is_empty() {
        NO_MARKERS
    } else {
        context.markers.as_str()
    };
    let snippets = if context.snippets.trim().is_empty() {
        NO_SNIPPETS
    } else {
        context.snippets.as_str()
    };

    let prompt = format!(
        "You are an expert engineer focused on {responsibility}.\n\
         Analyze the repository and propose improvements.\n\
         Return ONLY a unified diff that applies cleanly with `git apply` from the repository root.\n\
         Do not wrap the diff in markdown fences.\n\
         Avoid removing license/authorship lines.\n\
         Do not introduce malicious, destructive or breaking changes.\n\
         \n\
         Repository files:\n\
         {file_list}\n\
         \n\
         Annotation notes (TODO/FIXME/BUG):\n\
         {markers}\n\
         \n\
         Key snippets:\n\
         {snippets}\n"
    );

    strip_common_indent(&prompt).trim().to_string()
}

/// Remove the longest run of leading spaces/tabs shared by every non-blank
/// line. Whitespace-only lines become empty.
fn strip_common_indent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                &line[indent..]
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
