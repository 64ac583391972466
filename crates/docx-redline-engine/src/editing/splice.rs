//! The splice engine: rewrite a paragraph's run sequence so that a matched
//! character range becomes a tracked deletion, optionally followed by a
//! tracked insertion, with the surrounding text preserved in fresh boundary
//! runs.

use std::ops::Range;

use tracing::warn;

use crate::editing::flatten::run_ranges;
use crate::editing::revision::{build_deletion, build_insertion};
use crate::models::{InlineNode, Paragraph};

/// One replacement to carry out against an already-matched range.
#[derive(Debug)]
pub struct Splice<'a> {
    /// Matched half-open byte range in the paragraph's flattened text.
    pub range: Range<usize>,
    /// Replacement text; empty means pure deletion.
    pub replacement: &'a str,
    pub author: &'a str,
    pub date: &'a str,
    /// First revision identifier to allocate from.
    pub next_id: u64,
}

/// Apply `splice` to the paragraph and return the number of revision
/// identifiers consumed: 2 for delete+insert, 1 for pure deletion, 0 when the
/// range turned out to cover no runs (defensive no-op, the paragraph is left
/// untouched).
///
/// The affected run range is replaced, at the index vacated by the first
/// affected run, with: preserved prefix run (if the match starts mid-run),
/// the deletion block, the insertion block (if replacing), preserved suffix
/// run (if the match ends mid-run). Both new blocks carry the formatting of
/// the first affected run; an identical replacement still records a full
/// delete+insert pair so reviewers see the change.
pub fn splice(para: &mut Paragraph, request: Splice<'_>) -> u64 {
    let Splice {
        range,
        replacement,
        author,
        date,
        next_id,
    } = request;

    let spans = run_ranges(para);
    let affected: Vec<_> = spans.iter().filter(|s| s.intersects(&range)).collect();

    let (Some(first), Some(last)) = (affected.first(), affected.last()) else {
        warn!(start = range.start, end = range.end, "match range covers no runs, skipping");
        return 0;
    };

    let (Some(first_run), Some(last_run)) = (para.run_at(first.node_index), para.run_at(last.node_index))
    else {
        // run_ranges only reports run nodes, so this cannot happen; bail
        // rather than corrupt the paragraph.
        warn!("affected node is not a run, skipping");
        return 0;
    };

    // The leading run's formatting wins for both new blocks.
    let props = first_run.props.clone();

    // Preserved fragment before the match, when it starts strictly inside the
    // first affected run.
    let prefix = if range.start > first.start {
        first_run.split(range.start - first.start).0
    } else {
        None
    };

    // Preserved fragment after the match, when it ends strictly inside the
    // last affected run.
    let suffix = if range.end < last.end {
        last_run.split(range.end - last.start).1
    } else {
        None
    };

    // Deleted text: each affected run's text clipped to its overlap with the
    // match, in run order.
    let mut deleted = String::new();
    for span in &affected {
        let Some(run) = para.run_at(span.node_index) else {
            continue;
        };
        let text = run.text();
        let clip_start = range.start.max(span.start) - span.start;
        let clip_end = range.end.min(span.end) - span.start;
        deleted.push_str(&text[clip_start..clip_end]);
    }

    let mut replacement_nodes = Vec::with_capacity(4);
    if let Some(run) = prefix {
        replacement_nodes.push(InlineNode::Run(run));
    }
    replacement_nodes.push(build_deletion(next_id, author, date, deleted, props.clone()));
    let mut used = 1;
    if !replacement.is_empty() {
        replacement_nodes.push(build_insertion(next_id + 1, author, date, replacement, props));
        used = 2;
    }
    if let Some(run) = suffix {
        replacement_nodes.push(InlineNode::Run(run));
    }

    let removed: Vec<usize> = affected.iter().map(|s| s.node_index).collect();
    para.replace_nodes(&removed, replacement_nodes);
    used
}
