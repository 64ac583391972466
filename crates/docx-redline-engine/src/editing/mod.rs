/*!
 * # Editing core
 *
 * The offset-mapping and run-splicing engine. A paragraph is an explicit
 * list of tagged inline nodes mutated by index; all edits flow through
 * these modules:
 *
 * - **`flatten`**: compute a paragraph's full text from its runs and map
 *   character ranges back to the runs that carry them. Recomputed after
 *   every mutation — offsets are never cached across edits.
 * - **`splice`**: rewrite a matched run range into preserved boundary
 *   fragments plus tracked deletion/insertion blocks, keeping surrounding
 *   node order intact.
 * - **`revision`**: construct deletion/insertion blocks and seed the
 *   document-wide revision identifier counter (one scan per batch).
 * - **`comment`**: build comment bodies and wrap paragraphs in comment
 *   anchors; comment ids live in their own identifier space.
 * - **`batch`**: apply a whole instruction batch in deterministic order,
 *   comments before revisions, skipping invalid or unmatched requests with
 *   a warning.
 */

pub mod batch;
pub mod comment;
pub mod flatten;
pub mod revision;
pub mod splice;

pub use batch::{BatchOutcome, apply};
pub use flatten::{RunSpan, accepted_text, full_text, locate_range, rejected_text, run_ranges};
pub use splice::{Splice, splice};
