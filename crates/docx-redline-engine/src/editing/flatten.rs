//! Paragraph flattening: the mapping between a paragraph's concatenated run
//! text and the runs that carry it.
//!
//! All offsets are byte offsets into the flattened UTF-8 text. Offsets handed
//! onwards come from substring matches against that text, so they always sit
//! on character boundaries. Nothing here is cached: the flattened text is
//! recomputed from the paragraph's current nodes on every call, so offsets
//! are never stale across mutations.

use std::ops::Range;

use crate::models::{InlineNode, Paragraph};

/// Where one run's text sits in the paragraph's flattened text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpan {
    /// Index of the run's node within the paragraph.
    pub node_index: usize,
    /// Half-open byte range `[start, end)` in the flattened text.
    pub start: usize,
    pub end: usize,
}

impl RunSpan {
    /// Whether this run contributes any text to `[start, end)`.
    pub fn intersects(&self, range: &Range<usize>) -> bool {
        self.start < range.end && self.end > range.start
    }
}

/// The paragraph's full text: every run's text concatenated in document
/// order. Markup nodes (existing revisions, comment marks, pass-through
/// content) contribute nothing.
pub fn full_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for node in para.nodes() {
        if let InlineNode::Run(run) = node {
            text.push_str(&run.text());
        }
    }
    text
}

/// First occurrence of `target` in the paragraph's flattened text, as a
/// half-open byte range. Plain substring search, not a pattern match.
pub fn locate_range(para: &Paragraph, target: &str) -> Option<Range<usize>> {
    full_text(para)
        .find(target)
        .map(|start| start..start + target.len())
}

/// Runs in document order with their cumulative character spans, for
/// deciding which runs a matched range covers.
pub fn run_ranges(para: &Paragraph) -> Vec<RunSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    for (node_index, node) in para.nodes().iter().enumerate() {
        if let InlineNode::Run(run) = node {
            let len = run.text_len();
            spans.push(RunSpan {
                node_index,
                start: cursor,
                end: cursor + len,
            });
            cursor += len;
        }
    }
    spans
}

/// The text a reader sees with every change accepted: run text plus inserted
/// text, deletions gone.
pub fn accepted_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for node in para.nodes() {
        match node {
            InlineNode::Run(run) => text.push_str(&run.text()),
            InlineNode::Insertion(block) => text.push_str(&block.text),
            _ => {}
        }
    }
    text
}

/// The text a reader sees with every change rejected: run text plus deleted
/// text, insertions gone.
pub fn rejected_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for node in para.nodes() {
        match node {
            InlineNode::Run(run) => text.push_str(&run.text()),
            InlineNode::Deletion(block) => text.push_str(&block.text),
            _ => {}
        }
    }
    text
}
