//! Markdown documentation of a registry
//!
//! One section per registered entry, in listing order, rendered through an
//! embedded Tera template. Nothing is constructed while rendering.

use std::sync::Arc;

use lazy_di_core::{Entry, ProviderPath, Registry, Require, Result};
use serde::Serialize;
use tera::{Context, Tera};

use crate::constants::{DEFAULT_DOCS_PREAMBLE, UNDOCUMENTED};
use crate::error_ext::ErrorContext;

const TPL_DOCS: &str = include_str!("templates/docs.md");
const TPL_DOCS_NAME: &str = "docs.md";

/// Page view model
#[derive(Debug, Serialize)]
struct DocsView {
    preamble: String,
    sections: Vec<SectionView>,
}

/// One entry
#[derive(Debug, Serialize)]
struct SectionView {
    path: String,
    anchor: String,
    requires: Vec<RequireView>,
    docs: String,
}

/// One dependency line; `anchor` is set when a listed entry provides it
#[derive(Debug, Serialize)]
struct RequireView {
    label: String,
    anchor: Option<String>,
}

/// Render documentation for every registered entry
///
/// `preamble` defaults to `# Documentation`.
pub fn render_docs(registry: &Registry, preamble: Option<&str>) -> Result<String> {
    let listed = registry.list()?;
    let view = DocsView {
        preamble: trim_docs(preamble.unwrap_or(DEFAULT_DOCS_PREAMBLE)),
        sections: build_sections(&listed),
    };

    let mut tera = Tera::default();
    tera.add_raw_template(TPL_DOCS_NAME, TPL_DOCS)
        .context("Failed to load documentation template")?;
    let context = Context::from_serialize(&view).context("Failed to build documentation context")?;
    let rendered = tera
        .render(TPL_DOCS_NAME, &context)
        .context("Failed to render documentation")?;

    Ok(collapse(rendered.trim()))
}

fn build_sections(listed: &[(String, Arc<Entry>)]) -> Vec<SectionView> {
    // Parsed once for link lookup; listed paths are always valid
    let targets: Vec<(ProviderPath, &str)> = listed
        .iter()
        .filter_map(|(path, _)| ProviderPath::parse(path).ok().map(|p| (p, path.as_str())))
        .collect();

    listed
        .iter()
        .map(|(path, entry)| SectionView {
            path: path.clone(),
            anchor: anchor(path),
            requires: entry
                .requires()
                .iter()
                .map(|require| RequireView {
                    label: require.label().to_string(),
                    anchor: link_target(require, &targets).map(anchor),
                })
                .collect(),
            docs: entry.docs().map_or_else(|| UNDOCUMENTED.to_string(), trim_docs),
        })
        .collect()
}

fn link_target<'a>(require: &Require, targets: &[(ProviderPath, &'a str)]) -> Option<&'a str> {
    let Require::Literal(dep) = require else {
        return None;
    };
    let dep = ProviderPath::parse(dep).ok()?;
    // a concrete entry wins over the template that would also match it
    targets
        .iter()
        .find(|(path, _)| *path == dep)
        .or_else(|| targets.iter().find(|(path, _)| path.matches(&dep)))
        .map(|(_, raw)| *raw)
}

/// HTML id for a section; paths are unique so ids are too
fn anchor(path: &str) -> String {
    format!("dep-{}", path.replace("::", "."))
}

/// Normalise a docs block
///
/// Removes the indentation of the first non-blank line from every line,
/// trims the result and collapses runs of blank lines into one.
pub fn trim_docs(docs: &str) -> String {
    let indent: String = docs
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| *c == ' ' || *c == '\t').collect())
        .unwrap_or_default();

    let dedented = docs
        .lines()
        .map(|line| line.strip_prefix(indent.as_str()).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n");

    collapse(dedented.trim())
}

/// Keep at most one blank line between paragraphs
fn collapse(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines() {
        let blank = line.trim().is_empty();
        if blank && out.last().is_some_and(|prev| prev.is_empty()) {
            continue;
        }
        out.push(if blank { "" } else { line });
    }
    out.join("\n")
}
