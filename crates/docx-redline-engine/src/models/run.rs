/// Opaque formatting-properties block captured from a run's `<w:rPr>` element.
///
/// Held as the raw XML slice of the source part. The engine copies it onto
/// split fragments and revision blocks verbatim and never interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProps(String);

impl RunProps {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw `<w:rPr>...</w:rPr>` markup.
    pub fn as_xml(&self) -> &str {
        &self.0
    }
}

/// One contiguous span of text sharing a single formatting definition.
///
/// A run holds an ordered list of text fragments (one per `<w:t>` carrier in
/// the source) plus the optional formatting block. The run's text is the
/// concatenation of its fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub props: Option<RunProps>,
    pub fragments: Vec<String>,
}

impl Run {
    pub fn new(props: Option<RunProps>, fragments: Vec<String>) -> Self {
        Self { props, fragments }
    }

    /// Single-fragment convenience constructor.
    pub fn with_text(props: Option<RunProps>, text: impl Into<String>) -> Self {
        Self {
            props,
            fragments: vec![text.into()],
        }
    }

    /// The run's extracted text: all fragments concatenated in order.
    pub fn text(&self) -> String {
        self.fragments.concat()
    }

    /// Byte length of the run's text.
    pub fn text_len(&self) -> usize {
        self.fragments.iter().map(|f| f.len()).sum()
    }

    /// Split the run at `offset` (a byte offset into [`Run::text`], which must
    /// lie on a character boundary) into `text[..offset]` and `text[offset..]`
    /// halves.
    ///
    /// Both halves carry a deep copy of the run's formatting block. A half
    /// with empty text is absent, never an empty run.
    pub fn split(&self, offset: usize) -> (Option<Run>, Option<Run>) {
        let text = self.text();
        let before = &text[..offset];
        let after = &text[offset..];

        let make = |slice: &str| {
            if slice.is_empty() {
                None
            } else {
                Some(Run::with_text(self.props.clone(), slice))
            }
        };

        (make(before), make(after))
    }
}
