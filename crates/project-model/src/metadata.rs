//! Narrative metadata derived from the full transcript.

use serde::{Deserialize, Serialize};

/// The four free-text fields produced by the metadata collaborator.
///
/// Each field is persisted as its own plain text artifact so it can be
/// edited by hand between stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeMetadata {
    /// Detailed summary of the story.
    pub summary: String,
    /// Locations with visual descriptions.
    pub locations: String,
    /// Main characters with look-alike, age, and clothing per location.
    pub cast: String,
    /// Short illustration style description.
    pub style: String,
}
