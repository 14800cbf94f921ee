//! talereel Project Model
//!
//! Defines the data contracts shared by every pipeline stage:
//! - **Transcript:** Timestamped words from the speech-to-text collaborator
//! - **Scene:** Sentences, grouped scene drafts, and timed scenes
//! - **Ledger:** Content hashes of the images each clip was rendered from
//! - **Project:** On-disk layout of every artifact, keyed by 1-based scene index
//! - **Manifest:** Per-scene artifact availability computed once per run
//!
//! All times are `f64` seconds from the start of the narration audio.

pub mod ledger;
pub mod manifest;
pub mod metadata;
pub mod project;
pub mod scene;
pub mod transcript;

pub use ledger::*;
pub use manifest::*;
pub use metadata::*;
pub use project::*;
pub use scene::*;
pub use transcript::*;
