use crate::models::paragraph::Paragraph;

/// One stretch of the body part: either a paragraph the engine can edit, or
/// raw markup preserved byte-for-byte (the body envelope, tables' structural
/// tags, section properties, anything between paragraphs).
#[derive(Debug, Clone)]
pub enum Segment {
    Raw(String),
    Paragraph(Paragraph),
}

/// The parsed body part: an alternating sequence of raw markup and
/// paragraphs, in document order.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    segments: Vec<Segment>,
    /// Highest `w:id`-style identifier seen anywhere in the source markup,
    /// captured once at parse time.
    max_source_id: u64,
}

impl DocumentTree {
    pub fn new(segments: Vec<Segment>, max_source_id: u64) -> Self {
        Self {
            segments,
            max_source_id,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn max_source_id(&self) -> u64 {
        self.max_source_id
    }

    /// Paragraphs in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Paragraph(p) => Some(p),
            Segment::Raw(_) => None,
        })
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.segments.iter_mut().filter_map(|s| match s {
            Segment::Paragraph(p) => Some(p),
            Segment::Raw(_) => None,
        })
    }
}
