pub mod comment;
pub mod document;
pub mod node;
pub mod paragraph;
pub mod run;

pub use comment::{CommentBody, CommentsPart};
pub use document::{DocumentTree, Segment};
pub use node::{InlineNode, RevisionBlock};
pub use paragraph::Paragraph;
pub use run::{Run, RunProps};
