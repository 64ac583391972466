//! Serialization of the document tree and comments part back to
//! WordprocessingML markup.
//!
//! Untouched paragraphs and raw segments are emitted verbatim; only dirty
//! paragraphs are re-rendered from their nodes.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::models::{CommentBody, CommentsPart, DocumentTree, InlineNode, Paragraph, Run, RevisionBlock, Segment};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Serialize the whole body part.
pub fn write_document(tree: &DocumentTree) -> String {
    let mut out = String::new();
    for segment in tree.segments() {
        match segment {
            Segment::Raw(raw) => out.push_str(raw),
            Segment::Paragraph(para) => write_paragraph(&mut out, para),
        }
    }
    out
}

fn write_paragraph(out: &mut String, para: &Paragraph) {
    if let Some(raw) = para.source_xml() {
        out.push_str(raw);
        return;
    }
    out.push_str(para.open_tag());
    for node in para.nodes() {
        render_node(out, node);
    }
    out.push_str("</w:p>");
}

fn render_node(out: &mut String, node: &InlineNode) {
    match node {
        InlineNode::Run(run) => render_run(out, run),
        InlineNode::Deletion(block) => render_revision(out, block, "w:del", "w:delText"),
        InlineNode::Insertion(block) => render_revision(out, block, "w:ins", "w:t"),
        InlineNode::CommentRangeStart(id) => {
            out.push_str(&format!(r#"<w:commentRangeStart w:id="{id}"/>"#));
        }
        InlineNode::CommentRangeEnd(id) => {
            out.push_str(&format!(r#"<w:commentRangeEnd w:id="{id}"/>"#));
        }
        InlineNode::CommentReference(id) => {
            out.push_str(&format!(
                concat!(
                    r#"<w:r><w:rPr><w:rStyle w:val="CommentReference"/></w:rPr>"#,
                    r#"<w:commentReference w:id="{id}"/></w:r>"#
                ),
                id = id
            ));
        }
        InlineNode::Passthrough(raw) => out.push_str(raw),
    }
}

fn render_run(out: &mut String, run: &Run) {
    out.push_str("<w:r>");
    if let Some(props) = &run.props {
        out.push_str(props.as_xml());
    }
    for fragment in &run.fragments {
        render_text_carrier(out, "w:t", fragment);
    }
    out.push_str("</w:r>");
}

/// Tracked change block: a wrapper element around a single run whose text
/// carrier differs between deletions (`w:delText`) and insertions (`w:t`).
fn render_revision(out: &mut String, block: &RevisionBlock, element: &str, carrier: &str) {
    out.push_str(&format!(
        r#"<{element} w:id="{id}" w:author="{author}" w:date="{date}">"#,
        id = block.id,
        author = encode_double_quoted_attribute(&block.author),
        date = encode_double_quoted_attribute(&block.date),
    ));
    out.push_str("<w:r>");
    if let Some(props) = &block.props {
        out.push_str(props.as_xml());
    }
    render_text_carrier(out, carrier, &block.text);
    out.push_str("</w:r>");
    out.push_str(&format!("</{element}>"));
}

fn render_text_carrier(out: &mut String, carrier: &str, text: &str) {
    out.push_str(&format!(
        r#"<{carrier} xml:space="preserve">{text}</{carrier}>"#,
        text = encode_text(text),
    ));
}

/// Serialize the comments part. An existing part is appended to in place;
/// a missing part gets a fresh skeleton.
pub fn write_comments(part: &CommentsPart) -> String {
    let mut rendered = String::new();
    for body in part.bodies() {
        render_comment_body(&mut rendered, body);
    }

    match part.existing_xml() {
        Some(existing) => match insert_before_root_close(existing, &rendered) {
            Some(updated) => updated,
            // Root close tag not found; leave the part as it was.
            None => existing.to_string(),
        },
        None => format!(
            concat!(
                "{decl}",
                r#"<w:comments xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#,
                r#" xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml""#,
                r#" xmlns:w15="http://schemas.microsoft.com/office/word/2012/wordml">"#,
                "{bodies}</w:comments>"
            ),
            decl = XML_DECL,
            bodies = rendered,
        ),
    }
}

fn render_comment_body(out: &mut String, body: &CommentBody) {
    out.push_str(&format!(
        r#"<w:comment w:id="{id}" w:author="{author}" w:initials="{initials}" w:date="{date}">"#,
        id = body.id,
        author = encode_double_quoted_attribute(&body.author),
        initials = encode_double_quoted_attribute(&body.initials.to_string()),
        date = encode_double_quoted_attribute(&body.date),
    ));
    // Reference mark run, then the comment text.
    out.push_str(concat!(
        "<w:p>",
        r#"<w:r><w:rPr><w:rStyle w:val="CommentReference"/></w:rPr><w:annotationRef/></w:r>"#,
    ));
    out.push_str("<w:r>");
    render_text_carrier(out, "w:t", &body.text);
    out.push_str("</w:r></w:p></w:comment>");
}

/// Insert `fragment` immediately before the document's root closing tag.
/// A self-closing root is expanded first. Returns `None` when no insertion
/// point can be found.
pub(crate) fn insert_before_root_close(xml: &str, fragment: &str) -> Option<String> {
    if let Some(pos) = xml.rfind("</") {
        let mut out = String::with_capacity(xml.len() + fragment.len());
        out.push_str(&xml[..pos]);
        out.push_str(fragment);
        out.push_str(&xml[pos..]);
        return Some(out);
    }

    // Self-closing root: `<name .../>` becomes `<name ...>fragment</name>`.
    let close = xml.rfind("/>")?;
    let open = xml[..close].rfind('<')?;
    let name: String = xml[open + 1..]
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '/' && *c != '>')
        .collect();
    let mut out = String::with_capacity(xml.len() + fragment.len() + name.len() + 3);
    out.push_str(&xml[..close]);
    out.push('>');
    out.push_str(fragment);
    out.push_str(&format!("</{name}>"));
    out.push_str(&xml[close + 2..]);
    Some(out)
}
