use crate::models::node::InlineNode;
use crate::models::run::Run;

/// One block of text: an ordered container of runs and other inline markup.
///
/// Paragraphs are owned by the document tree and mutated in place; the engine
/// never adds or removes paragraphs, only their node contents change. A
/// paragraph parsed from a source part remembers its original raw XML and
/// serializes byte-identically until the first mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Open tag including attributes, e.g. `<w:p w:rsidR="00A1">`.
    open_tag: String,
    nodes: Vec<InlineNode>,
    /// Raw XML of the whole element as read from the source part.
    source: Option<String>,
    dirty: bool,
}

impl Paragraph {
    /// Paragraph parsed from a source part, keeping the original markup for
    /// clean round-trips.
    pub fn from_source(
        open_tag: impl Into<String>,
        nodes: Vec<InlineNode>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            open_tag: open_tag.into(),
            nodes,
            source: Some(source.into()),
            dirty: false,
        }
    }

    /// Freshly built paragraph with a bare open tag.
    pub fn from_nodes(nodes: Vec<InlineNode>) -> Self {
        Self {
            open_tag: "<w:p>".to_string(),
            nodes,
            source: None,
            dirty: true,
        }
    }

    pub fn nodes(&self) -> &[InlineNode] {
        &self.nodes
    }

    pub fn open_tag(&self) -> &str {
        &self.open_tag
    }

    /// Original markup, available only while the paragraph is untouched.
    pub fn source_xml(&self) -> Option<&str> {
        if self.dirty {
            None
        } else {
            self.source.as_deref()
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn run_at(&self, index: usize) -> Option<&Run> {
        self.nodes.get(index).and_then(InlineNode::as_run)
    }

    pub fn insert_node(&mut self, index: usize, node: InlineNode) {
        self.nodes.insert(index, node);
        self.dirty = true;
    }

    pub fn push_node(&mut self, node: InlineNode) {
        self.nodes.push(node);
        self.dirty = true;
    }

    /// Remove the nodes at `removed` (ascending indices) and insert
    /// `replacement` at the position vacated by the first removed node.
    ///
    /// Indices between removed ones are kept, so markup interleaved with the
    /// affected runs survives after the inserted sequence.
    pub fn replace_nodes(&mut self, removed: &[usize], replacement: Vec<InlineNode>) {
        let Some(&first) = removed.first() else {
            return;
        };

        let old = std::mem::take(&mut self.nodes);
        let mut rebuilt = Vec::with_capacity(old.len() + replacement.len());
        let mut replacement = Some(replacement);

        for (index, node) in old.into_iter().enumerate() {
            if index == first {
                if let Some(seq) = replacement.take() {
                    rebuilt.extend(seq);
                }
            }
            if !removed.contains(&index) {
                rebuilt.push(node);
            }
        }
        // Out-of-range first index: append rather than drop the replacement.
        if let Some(seq) = replacement.take() {
            rebuilt.extend(seq);
        }

        self.nodes = rebuilt;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(text: &str) -> InlineNode {
        InlineNode::Run(Run::with_text(None, text))
    }

    fn texts(para: &Paragraph) -> Vec<String> {
        para.nodes()
            .iter()
            .map(|n| match n {
                InlineNode::Run(r) => r.text(),
                InlineNode::Passthrough(raw) => raw.clone(),
                other => format!("{other:?}"),
            })
            .collect()
    }

    #[test]
    fn replace_nodes_inserts_at_first_removed_index() {
        let mut para = Paragraph::from_nodes(vec![run("a"), run("b"), run("c")]);
        para.replace_nodes(&[1], vec![run("X"), run("Y")]);
        assert_eq!(texts(&para), vec!["a", "X", "Y", "c"]);
    }

    #[test]
    fn replace_nodes_keeps_interleaved_markup() {
        let mut para = Paragraph::from_nodes(vec![
            run("a"),
            InlineNode::Passthrough("<w:proofErr/>".to_string()),
            run("b"),
        ]);
        // Both runs removed; the proofing mark in between survives after the
        // inserted sequence.
        para.replace_nodes(&[0, 2], vec![run("X")]);
        assert_eq!(texts(&para), vec!["X", "<w:proofErr/>"]);
    }

    #[test]
    fn mutation_marks_paragraph_dirty() {
        let mut para = Paragraph::from_source("<w:p>", vec![run("a")], "<w:p><w:r/></w:p>");
        assert!(para.source_xml().is_some());
        para.push_node(run("b"));
        assert!(para.is_dirty());
        assert!(para.source_xml().is_none());
    }
}
