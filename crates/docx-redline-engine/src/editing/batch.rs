//! Batch application: drive a whole instruction batch against the in-memory
//! document tree, comments first, then revisions, in request order.

use tracing::{debug, info, warn};

use crate::editing::comment::{anchor_paragraph, build_comment_body, next_comment_id};
use crate::editing::flatten::{full_text, locate_range};
use crate::editing::revision::next_revision_id;
use crate::editing::splice::{Splice, splice};
use crate::instructions::Instructions;
use crate::models::{CommentsPart, DocumentTree};

/// What one batch run accomplished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub comments_applied: usize,
    pub revisions_applied: usize,
    /// Requests skipped because they were empty or their target was not
    /// found anywhere.
    pub skipped: usize,
}

/// Apply every request in the batch against the tree. Per-request failures
/// (target not found, empty fields) are warned about and skipped; the batch
/// always runs to completion.
///
/// `author` and `date` are used identically for every block created in this
/// batch.
pub fn apply(
    tree: &mut DocumentTree,
    comments: &mut CommentsPart,
    instructions: &Instructions,
    author: &str,
    date: &str,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    apply_comments(tree, comments, instructions, author, date, &mut outcome);
    apply_revisions(tree, instructions, author, date, &mut outcome);

    info!(
        comments = outcome.comments_applied,
        revisions = outcome.revisions_applied,
        skipped = outcome.skipped,
        "batch complete"
    );
    outcome
}

fn apply_comments(
    tree: &mut DocumentTree,
    comments: &mut CommentsPart,
    instructions: &Instructions,
    author: &str,
    date: &str,
    outcome: &mut BatchOutcome,
) {
    // Seeded once per batch, then incremented locally.
    let mut comment_id = next_comment_id(comments);

    for request in &instructions.comments {
        let target = request.target_text.trim();
        let text = request.comment.trim();
        if target.is_empty() || text.is_empty() {
            debug!("skipping comment request with empty fields");
            outcome.skipped += 1;
            continue;
        }

        // First paragraph in document order whose text contains the target.
        let found = tree
            .paragraphs_mut()
            .find(|para| full_text(para).contains(target));

        let Some(para) = found else {
            warn!(target = %preview(target), "comment target not found in any paragraph");
            outcome.skipped += 1;
            continue;
        };

        anchor_paragraph(para, comment_id);
        comments.append(build_comment_body(comment_id, author, text, date));
        comment_id += 1;
        outcome.comments_applied += 1;
    }
}

fn apply_revisions(
    tree: &mut DocumentTree,
    instructions: &Instructions,
    author: &str,
    date: &str,
    outcome: &mut BatchOutcome,
) {
    if instructions.revisions.is_empty() {
        return;
    }

    // One whole-document scan after comments were anchored; their ids share
    // the same attribute space.
    let mut revision_id = next_revision_id(tree);

    for request in &instructions.revisions {
        let old_text = request.old_text.trim();
        let new_text = request.new_text.trim();
        if old_text.is_empty() {
            debug!("skipping revision request with empty old text");
            outcome.skipped += 1;
            continue;
        }

        // First paragraph containing the target, first occurrence within it.
        let matched = tree.paragraphs_mut().find_map(|para| {
            locate_range(para, old_text).map(|range| (para, range))
        });

        let Some((para, range)) = matched else {
            warn!(target = %preview(old_text), "revision target not found in any paragraph");
            outcome.skipped += 1;
            continue;
        };

        let used = splice(
            para,
            Splice {
                range,
                replacement: new_text,
                author,
                date,
                next_id: revision_id,
            },
        );
        if used == 0 {
            outcome.skipped += 1;
            continue;
        }
        revision_id += used;
        outcome.revisions_applied += 1;
    }
}

/// Truncated target text for log lines.
fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 30;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX_CHARS).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::flatten::accepted_text;
    use crate::instructions::{CommentRequest, RevisionRequest};
    use crate::models::{InlineNode, Paragraph, Run, Segment};
    use pretty_assertions::assert_eq;

    const AUTHOR: &str = "Reviewer";
    const DATE: &str = "2026-08-30T12:00:00Z";

    fn tree_of(paragraph_texts: &[&str]) -> DocumentTree {
        let segments = paragraph_texts
            .iter()
            .map(|t| {
                Segment::Paragraph(Paragraph::from_nodes(vec![InlineNode::Run(
                    Run::with_text(None, *t),
                )]))
            })
            .collect();
        DocumentTree::new(segments, 0)
    }

    fn revisions(requests: &[(&str, &str)]) -> Instructions {
        Instructions {
            comments: Vec::new(),
            revisions: requests
                .iter()
                .map(|(old, new)| RevisionRequest {
                    old_text: old.to_string(),
                    new_text: new.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn revision_modifies_only_first_matching_paragraph() {
        let mut tree = tree_of(&["shared text here", "shared text there", "shared text again"]);
        let mut comments = CommentsPart::empty();
        let outcome = apply(
            &mut tree,
            &mut comments,
            &revisions(&[("shared", "common")]),
            AUTHOR,
            DATE,
        );

        assert_eq!(outcome.revisions_applied, 1);
        let texts: Vec<String> = tree.paragraphs().map(accepted_text).collect();
        assert_eq!(
            texts,
            vec!["common text here", "shared text there", "shared text again"]
        );
    }

    #[test]
    fn comment_anchors_only_first_containing_paragraph() {
        let mut tree = tree_of(&["Hello world", "world again"]);
        let mut comments = CommentsPart::empty();
        let instructions = Instructions {
            comments: vec![
                CommentRequest {
                    target_text: "world".to_string(),
                    comment: "check this".to_string(),
                },
                CommentRequest {
                    target_text: "world".to_string(),
                    comment: "and again".to_string(),
                },
            ],
            revisions: Vec::new(),
        };
        let outcome = apply(&mut tree, &mut comments, &instructions, AUTHOR, DATE);

        assert_eq!(outcome.comments_applied, 2);
        // Both requests independently match the first paragraph and get
        // distinct ids.
        assert_eq!(comments.bodies().len(), 2);
        assert_eq!(comments.bodies()[0].id, 1);
        assert_eq!(comments.bodies()[1].id, 2);
        assert_eq!(comments.bodies()[0].text, "check this");

        let first = tree.paragraphs().next().unwrap();
        let anchor_ids: Vec<u64> = first
            .nodes()
            .iter()
            .filter_map(|n| match n {
                InlineNode::CommentRangeStart(id) => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(anchor_ids, vec![2, 1]);

        let second = tree.paragraphs().nth(1).unwrap();
        assert!(second.nodes().iter().all(|n| n.as_run().is_some()));
    }

    #[test]
    fn unmatched_target_is_skipped_without_mutation() {
        let mut tree = tree_of(&["some text"]);
        let mut comments = CommentsPart::empty();
        let outcome = apply(
            &mut tree,
            &mut comments,
            &revisions(&[("absent phrase", "x")]),
            AUTHOR,
            DATE,
        );

        assert_eq!(outcome.revisions_applied, 0);
        assert_eq!(outcome.skipped, 1);
        assert!(!tree.paragraphs().next().unwrap().is_dirty());
    }

    #[test]
    fn empty_fields_are_skipped() {
        let mut tree = tree_of(&["some text"]);
        let mut comments = CommentsPart::empty();
        let instructions = Instructions {
            comments: vec![CommentRequest {
                target_text: "some".to_string(),
                comment: "   ".to_string(),
            }],
            revisions: vec![RevisionRequest {
                old_text: " ".to_string(),
                new_text: "x".to_string(),
            }],
        };
        let outcome = apply(&mut tree, &mut comments, &instructions, AUTHOR, DATE);
        assert_eq!(outcome, BatchOutcome { comments_applied: 0, revisions_applied: 0, skipped: 2 });
    }

    #[test]
    fn revision_ids_are_unique_and_increasing_across_batch() {
        let mut tree = tree_of(&["alpha beta gamma delta"]);
        let mut comments = CommentsPart::empty();
        apply(
            &mut tree,
            &mut comments,
            &revisions(&[("alpha", "A"), ("gamma", ""), ("delta", "D")]),
            AUTHOR,
            DATE,
        );

        let ids: Vec<u64> = tree
            .paragraphs()
            .flat_map(|p| p.nodes().iter().filter_map(InlineNode::tracked_id))
            .collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len(), "ids must be unique: {ids:?}");
        // del+ins, del, del+ins allocated in creation order.
        assert_eq!(ids.len(), 5);
        assert_eq!(*ids.iter().max().unwrap(), 5);
    }

    #[test]
    fn revision_ids_start_after_comment_anchor_ids() {
        let mut tree = tree_of(&["target phrase"]);
        let mut comments = CommentsPart::empty();
        let instructions = Instructions {
            comments: vec![CommentRequest {
                target_text: "target".to_string(),
                comment: "note".to_string(),
            }],
            revisions: vec![RevisionRequest {
                old_text: "phrase".to_string(),
                new_text: "wording".to_string(),
            }],
        };
        apply(&mut tree, &mut comments, &instructions, AUTHOR, DATE);

        let para = tree.paragraphs().next().unwrap();
        let revision_ids: Vec<u64> = para
            .nodes()
            .iter()
            .filter_map(|n| match n {
                InlineNode::Deletion(b) | InlineNode::Insertion(b) => Some(b.id),
                _ => None,
            })
            .collect();
        // Comment anchor took id 1; revisions continue from the scan.
        assert_eq!(revision_ids, vec![2, 3]);
    }
}
