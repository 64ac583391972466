/// The free-text content and metadata of one review comment, stored in the
/// comments part separately from the body text. Appended, never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody {
    pub id: u64,
    pub author: String,
    /// First character of the author name, `'A'` when the author is empty.
    pub initials: char,
    /// ISO-8601 UTC timestamp.
    pub date: String,
    pub text: String,
}

/// The comments collection backing a package's comments part.
///
/// An existing part is kept as its raw markup and only ever appended to; a
/// missing part starts empty and is created on write.
#[derive(Debug, Clone, Default)]
pub struct CommentsPart {
    /// Raw XML of the part as read from the package, if it existed.
    existing: Option<String>,
    max_existing_id: u64,
    bodies: Vec<CommentBody>,
}

impl CommentsPart {
    /// Collection for a package without a comments part.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collection wrapping an existing part whose highest comment id is
    /// already known.
    pub fn from_existing(raw: impl Into<String>, max_existing_id: u64) -> Self {
        Self {
            existing: Some(raw.into()),
            max_existing_id,
            bodies: Vec::new(),
        }
    }

    pub fn existing_xml(&self) -> Option<&str> {
        self.existing.as_deref()
    }

    pub fn max_existing_id(&self) -> u64 {
        self.max_existing_id
    }

    pub fn bodies(&self) -> &[CommentBody] {
        &self.bodies
    }

    pub fn append(&mut self, body: CommentBody) {
        self.bodies.push(body);
    }
}
