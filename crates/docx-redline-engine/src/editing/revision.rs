//! Construction of tracked-change blocks and the document-wide revision
//! identifier scan.

use crate::models::{DocumentTree, InlineNode, RevisionBlock, RunProps};

/// Build a deletion block wrapping `text`, carrying a deep copy of the
/// leading run's formatting.
pub fn build_deletion(
    id: u64,
    author: &str,
    date: &str,
    text: impl Into<String>,
    props: Option<RunProps>,
) -> InlineNode {
    InlineNode::Deletion(RevisionBlock::new(id, author, date, text, props))
}

/// Build an insertion block wrapping `text`.
pub fn build_insertion(
    id: u64,
    author: &str,
    date: &str,
    text: impl Into<String>,
    props: Option<RunProps>,
) -> InlineNode {
    InlineNode::Insertion(RevisionBlock::new(id, author, date, text, props))
}

/// Next free revision identifier: one past the highest identifier anywhere in
/// the document, counting both identifiers captured from the source markup at
/// parse time and identifiers on nodes added earlier in this batch (comment
/// anchors share the same attribute space).
///
/// Called once per batch to seed a locally incremented counter; never
/// re-scanned mid-batch.
pub fn next_revision_id(tree: &DocumentTree) -> u64 {
    let mut max_id = tree.max_source_id();
    for para in tree.paragraphs() {
        for node in para.nodes() {
            if let Some(id) = node.tracked_id() {
                max_id = max_id.max(id);
            }
        }
    }
    max_id + 1
}
