use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use docx_redline_config::Config;
use docx_redline_engine::models::CommentsPart;
use docx_redline_engine::package::{
    COMMENTS_PART, CONTENT_TYPES_PART, CORE_PROPS_PART, DOCUMENT_PART, DOCUMENT_RELS_PART,
    SETTINGS_PART,
};
use docx_redline_engine::xml::{
    document_author, ensure_comments_content_type, ensure_comments_relationship,
    ensure_track_revisions,
};
use docx_redline_engine::{
    Instructions, Package, apply, parse_comments, parse_document, write_comments, write_document,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_AUTHOR: &str = "Reviewer";
const DEFAULT_OUTPUT_SUFFIX: &str = "_reviewed";

/// Apply tracked changes and review comments to a .docx document.
#[derive(Parser)]
#[command(name = "docx-redline", version)]
struct Cli {
    /// Source document.
    input: PathBuf,
    /// JSON instruction file with comment and revision requests.
    instructions: PathBuf,
    /// Output document; defaults to `<input stem>_reviewed.docx`.
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Pre-flight: both input artifacts must exist before anything is touched.
    if !cli.input.exists() {
        bail!("input document not found: {}", cli.input.display());
    }
    if !cli.instructions.exists() {
        bail!("instruction file not found: {}", cli.instructions.display());
    }

    let instructions: Instructions = serde_json::from_str(
        &fs::read_to_string(&cli.instructions)
            .with_context(|| format!("failed to read {}", cli.instructions.display()))?,
    )
    .with_context(|| format!("failed to parse {}", cli.instructions.display()))?;

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            warn!("ignoring unusable config file: {err}");
            Config::default()
        }
    };

    let output = cli.output.clone().unwrap_or_else(|| {
        default_output_path(
            &cli.input,
            config.output_suffix.as_deref().unwrap_or(DEFAULT_OUTPUT_SUFFIX),
        )
    });

    let mut package = Package::read(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;

    let document_xml = package.required_part_str(DOCUMENT_PART)?;
    let mut tree = parse_document(&document_xml)?;

    let mut comments = match package.part_str(COMMENTS_PART)? {
        Some(xml) => parse_comments(&xml)?,
        None => CommentsPart::empty(),
    };

    let author = resolve_author(&package, config.fallback_author.as_deref())?;
    let date = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    info!(author = %author, "document author");

    let outcome = apply(&mut tree, &mut comments, &instructions, &author, &date);

    // Materialize: nothing is written until the whole batch is done.
    package.set_part(DOCUMENT_PART, write_document(&tree).into_bytes());

    if outcome.comments_applied > 0 {
        package.set_part(COMMENTS_PART, write_comments(&comments).into_bytes());
        if let Some(rels) = package.part_str(DOCUMENT_RELS_PART)?
            && let Some(updated) = ensure_comments_relationship(&rels)?
        {
            package.set_part(DOCUMENT_RELS_PART, updated.into_bytes());
        }
        if let Some(types) = package.part_str(CONTENT_TYPES_PART)?
            && let Some(updated) = ensure_comments_content_type(&types)?
        {
            package.set_part(CONTENT_TYPES_PART, updated.into_bytes());
        }
    }

    if outcome.revisions_applied > 0
        && let Some(settings) = package.part_str(SETTINGS_PART)?
        && let Some(updated) = ensure_track_revisions(&settings)?
    {
        package.set_part(SETTINGS_PART, updated.into_bytes());
    }

    package
        .write(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Applied {} comment(s) and {} revision(s), {} skipped -> {}",
        outcome.comments_applied,
        outcome.revisions_applied,
        outcome.skipped,
        output.display()
    );
    Ok(())
}

fn default_output_path(input: &std::path::Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let extension = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}{extension}"))
}

fn resolve_author(package: &Package, fallback: Option<&str>) -> Result<String> {
    if let Some(core) = package.part_str(CORE_PROPS_PART)?
        && let Some(author) = document_author(&core)?
    {
        return Ok(author);
    }
    Ok(fallback.unwrap_or(DEFAULT_AUTHOR).to_string())
}
