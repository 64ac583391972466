//! Parsing of WordprocessingML parts into the engine's node model.
//!
//! Only paragraphs and their plain text runs are lifted into typed nodes;
//! everything else is captured as raw markup slices so untouched content
//! round-trips byte-for-byte.

use roxmltree::{Document, Node};
use thiserror::Error;

use crate::models::{CommentsPart, DocumentTree, InlineNode, Paragraph, Run, RunProps, Segment};

/// Main WordprocessingML namespace.
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML in {part}: {source}")]
    Xml {
        part: &'static str,
        source: roxmltree::Error,
    },
}

fn is_w(node: &Node, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && node.tag_name().namespace() == Some(W_NS)
}

/// Parse the body part into a document tree.
pub fn parse_document(xml: &str) -> Result<DocumentTree, ParseError> {
    let doc = Document::parse(xml).map_err(|source| ParseError::Xml {
        part: "word/document.xml",
        source,
    })?;

    // One pass over every attribute for the highest existing id-style
    // identifier; seeds the revision counter later without re-scanning.
    let mut max_id = 0u64;
    for node in doc.descendants() {
        for attr in node.attributes() {
            if attr.name() == "id"
                && attr.namespace() == Some(W_NS)
                && let Ok(id) = attr.value().parse::<u64>()
            {
                max_id = max_id.max(id);
            }
        }
    }

    // Outermost paragraphs anywhere in the part, in document order. This
    // covers paragraphs nested in tables without modelling tables
    // themselves; a paragraph inside another paragraph's content (text
    // boxes) stays part of the outer paragraph's pass-through markup.
    let paragraphs: Vec<Node> = doc
        .descendants()
        .filter(|n| is_w(n, "p") && !n.ancestors().skip(1).any(|a| is_w(&a, "p")))
        .collect();

    let mut segments = Vec::with_capacity(paragraphs.len() * 2 + 1);
    let mut cursor = 0;
    for node in paragraphs {
        let range = node.range();
        if range.start > cursor {
            segments.push(Segment::Raw(xml[cursor..range.start].to_string()));
        }
        segments.push(Segment::Paragraph(parse_paragraph(&node, xml)));
        cursor = range.end;
    }
    if cursor < xml.len() {
        segments.push(Segment::Raw(xml[cursor..].to_string()));
    }

    Ok(DocumentTree::new(segments, max_id))
}

fn parse_paragraph(node: &Node, xml: &str) -> Paragraph {
    let range = node.range();
    let raw = &xml[range.start..range.end];

    let mut nodes = Vec::new();
    for child in node.children() {
        if is_w(&child, "r") && is_plain_text_run(&child) {
            nodes.push(InlineNode::Run(parse_run(&child, xml)));
        } else {
            // Existing revision markup, comment marks, bookmarks, proofing
            // marks, hyperlinks, runs with non-text content, stray text —
            // all preserved verbatim.
            let child_range = child.range();
            nodes.push(InlineNode::Passthrough(
                xml[child_range.start..child_range.end].to_string(),
            ));
        }
    }

    Paragraph::from_source(open_tag(raw), nodes, raw)
}

/// A run the engine can model: element children are only `rPr` and `t`.
/// Anything richer (breaks, tabs, drawings, field chars) keeps the whole run
/// opaque so splitting cannot drop content.
fn is_plain_text_run(run: &Node) -> bool {
    run.children().all(|c| {
        if c.is_element() {
            is_w(&c, "rPr") || is_w(&c, "t")
        } else {
            // Insignificant whitespace between child elements.
            c.is_text() && c.text().unwrap_or("").trim().is_empty()
        }
    })
}

fn parse_run(node: &Node, xml: &str) -> Run {
    let mut props = None;
    let mut fragments = Vec::new();
    for child in node.children() {
        if is_w(&child, "rPr") {
            let range = child.range();
            props = Some(RunProps::new(&xml[range.start..range.end]));
        } else if is_w(&child, "t") {
            fragments.push(element_text(&child));
        }
    }
    Run::new(props, fragments)
}

/// Concatenated character data of an element (entity references arrive as
/// separate text nodes).
fn element_text(node: &Node) -> String {
    node.children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect()
}

/// The element's open tag, with a self-closing tag normalised to an open
/// tag so content can be appended on serialization.
fn open_tag(raw: &str) -> String {
    let mut in_quote = None;
    for (index, byte) in raw.bytes().enumerate() {
        match (byte, in_quote) {
            (b'"' | b'\'', None) => in_quote = Some(byte),
            (q, Some(open)) if q == open => in_quote = None,
            (b'>', None) => {
                return if raw[..index].ends_with('/') {
                    format!("{}>", &raw[..index - 1])
                } else {
                    raw[..=index].to_string()
                };
            }
            _ => {}
        }
    }
    raw.to_string()
}

/// Parse the comments part, recording its highest existing comment id.
pub fn parse_comments(xml: &str) -> Result<CommentsPart, ParseError> {
    let doc = Document::parse(xml).map_err(|source| ParseError::Xml {
        part: "word/comments.xml",
        source,
    })?;

    let mut max_id = 0u64;
    for node in doc.descendants() {
        if is_w(&node, "comment")
            && let Some(id) = node.attribute((W_NS, "id"))
            && let Ok(id) = id.parse::<u64>()
        {
            max_id = max_id.max(id);
        }
    }

    Ok(CommentsPart::from_existing(xml, max_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
        r#"<w:body>"#,
        r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p>"#,
        r#"<w:p w:rsidR="00AB"><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t xml:space="preserve">second</w:t></w:r></w:p>"#,
        r#"<w:sectPr/>"#,
        r#"</w:body></w:document>"#
    );

    #[test]
    fn paragraph_runs_and_text_are_lifted() {
        let tree = parse_document(BODY).unwrap();
        let texts: Vec<String> = tree
            .paragraphs()
            .map(crate::editing::flatten::full_text)
            .collect();
        assert_eq!(texts, vec!["Hello world", "second"]);
    }

    #[test]
    fn run_formatting_is_captured_verbatim() {
        let tree = parse_document(BODY).unwrap();
        let first = tree.paragraphs().next().unwrap();
        let run = first.run_at(0).unwrap();
        assert_eq!(
            run.props.as_ref().map(|p| p.as_xml()),
            Some("<w:rPr><w:b/></w:rPr>")
        );
    }

    #[test]
    fn paragraph_properties_stay_passthrough() {
        let tree = parse_document(BODY).unwrap();
        let second = tree.paragraphs().nth(1).unwrap();
        assert!(matches!(
            &second.nodes()[0],
            InlineNode::Passthrough(raw) if raw.starts_with("<w:pPr>")
        ));
    }

    #[test]
    fn open_tag_keeps_attributes() {
        let tree = parse_document(BODY).unwrap();
        let second = tree.paragraphs().nth(1).unwrap();
        assert_eq!(second.open_tag(), r#"<w:p w:rsidR="00AB">"#);
    }

    #[test]
    fn open_tag_normalises_self_closing() {
        assert_eq!(open_tag("<w:p/>"), "<w:p>");
        assert_eq!(open_tag(r#"<w:p w:rsidR="00AB"/>"#), r#"<w:p w:rsidR="00AB">"#);
    }

    #[test]
    fn max_source_id_covers_existing_revision_markup() {
        let xml = concat!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
            r#"<w:p><w:ins w:id="17" w:author="A" w:date="2026-01-01T00:00:00Z">"#,
            r#"<w:r><w:t>new</w:t></w:r></w:ins></w:p>"#,
            r#"</w:body></w:document>"#
        );
        let tree = parse_document(xml).unwrap();
        assert_eq!(tree.max_source_id(), 17);
        // The existing insertion is pass-through, not a run.
        let para = tree.paragraphs().next().unwrap();
        assert_eq!(crate::editing::flatten::full_text(para), "");
    }

    #[test]
    fn run_with_exotic_content_stays_opaque() {
        let xml = concat!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
            r#"<w:p><w:r><w:t>a</w:t><w:br/></w:r><w:r><w:t>b</w:t></w:r></w:p>"#,
            r#"</w:body></w:document>"#
        );
        let tree = parse_document(xml).unwrap();
        let para = tree.paragraphs().next().unwrap();
        assert!(matches!(&para.nodes()[0], InlineNode::Passthrough(_)));
        assert_eq!(crate::editing::flatten::full_text(para), "b");
    }

    #[test]
    fn table_paragraphs_are_editable() {
        let xml = concat!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell text</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
            r#"</w:body></w:document>"#
        );
        let tree = parse_document(xml).unwrap();
        let texts: Vec<String> = tree
            .paragraphs()
            .map(crate::editing::flatten::full_text)
            .collect();
        assert_eq!(texts, vec!["cell text"]);
    }

    #[test]
    fn escaped_text_is_unescaped_on_parse() {
        let xml = concat!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
            r#"<w:p><w:r><w:t>a &amp; b &lt; c</w:t></w:r></w:p>"#,
            r#"</w:body></w:document>"#
        );
        let tree = parse_document(xml).unwrap();
        let para = tree.paragraphs().next().unwrap();
        assert_eq!(crate::editing::flatten::full_text(para), "a & b < c");
    }

    #[test]
    fn comments_part_max_id() {
        let xml = concat!(
            r#"<w:comments xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            r#"<w:comment w:id="3" w:author="A"/><w:comment w:id="9" w:author="B"/>"#,
            r#"</w:comments>"#
        );
        let part = parse_comments(xml).unwrap();
        assert_eq!(part.max_existing_id(), 9);
    }

    #[test]
    fn malformed_part_is_a_parse_error() {
        assert!(parse_document("<w:document").is_err());
    }
}
