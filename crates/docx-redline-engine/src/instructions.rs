//! The instruction batch: the plain-data request lists the engine applies.

use serde::{Deserialize, Serialize};

/// One review comment request: anchor a comment to the first paragraph whose
/// text contains `target_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRequest {
    pub target_text: String,
    pub comment: String,
}

/// One tracked-change request: replace the first occurrence of `old_text`
/// with `new_text` (empty `new_text` means pure deletion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRequest {
    pub old_text: String,
    #[serde(default)]
    pub new_text: String,
}

/// A whole batch, as parsed from the instruction file. Both lists are
/// optional in the JSON; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructions {
    #[serde(default)]
    pub comments: Vec<CommentRequest>,
    #[serde(default)]
    pub revisions: Vec<RevisionRequest>,
}
