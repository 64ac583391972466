//! Reading and writing of WordprocessingML markup.

pub mod parse;
pub mod parts;
pub mod write;

pub use parse::{ParseError, W_NS, parse_comments, parse_document};
pub use parts::{
    document_author, ensure_comments_content_type, ensure_comments_relationship,
    ensure_track_revisions,
};
pub use write::{write_comments, write_document};
