//! Bookkeeping on the package's side-car parts: the relationship graph and
//! content-type registry entries for the comments part, the track-changes
//! settings toggle, and the document author lookup.
//!
//! All of these edit the part minimally: a parsed check first, then a single
//! fragment inserted before the root closing tag, leaving existing content
//! byte-for-byte intact. Every operation is idempotent.

use roxmltree::Document;

use crate::xml::parse::{ParseError, W_NS};
use crate::xml::write::insert_before_root_close;

const COMMENTS_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";
const COMMENTS_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
const CP_NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";

/// Ensure `word/_rels/document.xml.rels` carries a relationship to the
/// comments part. Returns the updated markup, or `None` when the entry
/// already exists (or no insertion point could be found).
pub fn ensure_comments_relationship(rels_xml: &str) -> Result<Option<String>, ParseError> {
    let doc = Document::parse(rels_xml).map_err(|source| ParseError::Xml {
        part: "word/_rels/document.xml.rels",
        source,
    })?;

    let mut max_rid = 0u64;
    for node in doc.descendants().filter(|n| n.is_element()) {
        if node.tag_name().name() != "Relationship" {
            continue;
        }
        if node.attribute("Type") == Some(COMMENTS_REL_TYPE) {
            return Ok(None);
        }
        if let Some(rid) = node.attribute("Id")
            && let Some(number) = rid.strip_prefix("rId")
            && let Ok(number) = number.parse::<u64>()
        {
            max_rid = max_rid.max(number);
        }
    }

    let entry = format!(
        r#"<Relationship Id="rId{}" Type="{COMMENTS_REL_TYPE}" Target="comments.xml"/>"#,
        max_rid + 1
    );
    Ok(insert_before_root_close(rels_xml, &entry))
}

/// Ensure `[Content_Types].xml` declares the comments part. Returns the
/// updated markup, or `None` when already declared.
pub fn ensure_comments_content_type(types_xml: &str) -> Result<Option<String>, ParseError> {
    let doc = Document::parse(types_xml).map_err(|source| ParseError::Xml {
        part: "[Content_Types].xml",
        source,
    })?;

    let declared = doc.descendants().any(|n| {
        n.is_element()
            && n.tag_name().name() == "Override"
            && n.attribute("PartName") == Some("/word/comments.xml")
    });
    if declared {
        return Ok(None);
    }

    let entry = format!(
        r#"<Override PartName="/word/comments.xml" ContentType="{COMMENTS_CONTENT_TYPE}"/>"#
    );
    Ok(insert_before_root_close(types_xml, &entry))
}

/// Ensure `word/settings.xml` switches revision tracking on. Returns the
/// updated markup, or `None` when the flag is already present.
pub fn ensure_track_revisions(settings_xml: &str) -> Result<Option<String>, ParseError> {
    let doc = Document::parse(settings_xml).map_err(|source| ParseError::Xml {
        part: "word/settings.xml",
        source,
    })?;

    let present = doc.descendants().any(|n| {
        n.is_element()
            && n.tag_name().name() == "trackRevisions"
            && n.tag_name().namespace() == Some(W_NS)
    });
    if present {
        return Ok(None);
    }

    Ok(insert_before_root_close(
        settings_xml,
        r#"<w:trackRevisions w:val="1"/>"#,
    ))
}

/// The document author from `docProps/core.xml`: `dc:creator`, falling back
/// to `cp:lastModifiedBy` for documents last touched by WPS.
pub fn document_author(core_xml: &str) -> Result<Option<String>, ParseError> {
    let doc = Document::parse(core_xml).map_err(|source| ParseError::Xml {
        part: "docProps/core.xml",
        source,
    })?;

    let text_of = |ns: &str, local: &str| -> Option<String> {
        doc.descendants()
            .find(|n| {
                n.is_element()
                    && n.tag_name().name() == local
                    && n.tag_name().namespace() == Some(ns)
            })
            .and_then(|n| n.text())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    };

    Ok(text_of(DC_NS, "creator").or_else(|| text_of(CP_NS, "lastModifiedBy")))
}
