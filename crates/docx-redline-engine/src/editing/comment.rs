//! Comment bodies and the anchor markup that ties a paragraph to them.
//!
//! Unlike revisions, comment targeting is paragraph-granular: the anchor
//! wraps the whole paragraph that contained the matched text, not just the
//! match itself.

use crate::models::{CommentBody, CommentsPart, InlineNode, Paragraph};

/// Next free comment identifier: one past the highest id already in the
/// collection, counting bodies appended earlier in this batch. The comment id
/// space is disjoint from revision ids.
pub fn next_comment_id(part: &CommentsPart) -> u64 {
    let appended_max = part.bodies().iter().map(|b| b.id).max().unwrap_or(0);
    part.max_existing_id().max(appended_max) + 1
}

/// Build one comment body record.
pub fn build_comment_body(id: u64, author: &str, text: &str, date: &str) -> CommentBody {
    CommentBody {
        id,
        author: author.to_string(),
        initials: author.chars().next().unwrap_or('A'),
        date: date.to_string(),
        text: text.to_string(),
    }
}

/// Wrap the paragraph's entire content in a comment anchor: range-start at
/// the first position, range-end at the last, then the reference run.
pub fn anchor_paragraph(para: &mut Paragraph, id: u64) {
    para.insert_node(0, InlineNode::CommentRangeStart(id));
    para.push_node(InlineNode::CommentRangeEnd(id));
    para.push_node(InlineNode::CommentReference(id));
}
