/*!
 * # docx-redline-engine
 *
 * Inserts tracked-change markup and review comments into a WordprocessingML
 * document's body at precise text locations, without disturbing run-level
 * formatting or any other byte of the package.
 *
 * The hard part lives in [`editing`]: document text is split arbitrarily
 * across formatting runs, so a target phrase may straddle run boundaries and
 * require splitting a run mid-text, then reassembling the node sequence with
 * correctly nested markup and globally unique revision identifiers.
 *
 * - [`models`]: paragraphs as explicit lists of tagged inline nodes, with
 *   opaque formatting blocks and clean-paragraph round-trip markup.
 * - [`editing`]: the flattener, the splice engine, revision and comment
 *   builders, and the batch driver.
 * - [`xml`]: WordprocessingML parsing/serialization and side-car part
 *   bookkeeping (relationships, content types, settings, author lookup).
 * - [`package`]: archive extraction and all-or-nothing repacking.
 * - [`instructions`]: the JSON request batch.
 */

pub mod editing;
pub mod instructions;
pub mod models;
pub mod package;
pub mod xml;

// Re-export key types for easier usage
pub use editing::{BatchOutcome, apply};
pub use instructions::{CommentRequest, Instructions, RevisionRequest};
pub use models::{CommentsPart, DocumentTree, InlineNode, Paragraph, Run, RunProps};
pub use package::{Package, PackageError};
pub use xml::{ParseError, parse_comments, parse_document, write_comments, write_document};
