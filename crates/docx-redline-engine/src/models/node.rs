use crate::models::run::{Run, RunProps};

/// A tracked-change record: deleted or inserted text wrapped with a revision
/// identifier, author and timestamp, carrying the formatting copied from the
/// leading affected run. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionBlock {
    pub id: u64,
    pub author: String,
    /// ISO-8601 UTC timestamp, e.g. `2026-08-30T12:00:00Z`.
    pub date: String,
    pub text: String,
    pub props: Option<RunProps>,
}

impl RevisionBlock {
    pub fn new(
        id: u64,
        author: impl Into<String>,
        date: impl Into<String>,
        text: impl Into<String>,
        props: Option<RunProps>,
    ) -> Self {
        Self {
            id,
            author: author.into(),
            date: date.into(),
            text: text.into(),
            props,
        }
    }
}

/// One inline child of a paragraph.
///
/// Paragraphs are an explicit node list manipulated by index; anything the
/// engine does not model (existing revision markup, bookmarks, proofing
/// marks, runs with non-text content) is carried through verbatim as
/// [`InlineNode::Passthrough`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    Run(Run),
    /// `<w:del>` tracked deletion.
    Deletion(RevisionBlock),
    /// `<w:ins>` tracked insertion.
    Insertion(RevisionBlock),
    /// Paragraph-leading comment range marker.
    CommentRangeStart(u64),
    /// Paragraph-trailing comment range marker.
    CommentRangeEnd(u64),
    /// Trailing reference run pointing back at a comment body.
    CommentReference(u64),
    /// Raw XML preserved byte-for-byte.
    Passthrough(String),
}

impl InlineNode {
    pub fn as_run(&self) -> Option<&Run> {
        match self {
            InlineNode::Run(run) => Some(run),
            _ => None,
        }
    }

    /// The identifier this node contributes to the revision-id space, if any.
    ///
    /// Comment range markers share the `w:id` attribute space scanned when
    /// seeding the revision counter, so they count here too.
    pub fn tracked_id(&self) -> Option<u64> {
        match self {
            InlineNode::Deletion(block) | InlineNode::Insertion(block) => Some(block.id),
            InlineNode::CommentRangeStart(id)
            | InlineNode::CommentRangeEnd(id)
            | InlineNode::CommentReference(id) => Some(*id),
            InlineNode::Run(_) | InlineNode::Passthrough(_) => None,
        }
    }
}
