//! Styled report rendering.
//!
//! A style transform turns the structured report into a browsable document.
//! The bundled style and caller-supplied styles are both templates with
//! `{{placeholder}}` slots filled from the parsed report.

use indexmap::IndexMap;
use quick_xml::escape::escape;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use super::xml::ReportDocument;
use crate::error::{AuditError, Result};

const DEFAULT_TEMPLATE: &str = include_str!("../../assets/report.html");
const DEFAULT_STYLE_NAME: &str = "default";
const PLACEHOLDER_PATTERN: &str = r"\{\{\s*([A-Za-z_]+)\s*\}\}";

/// Slots a template may reference.
pub const PLACEHOLDERS: &[&str] = &["title", "summary", "families", "unapproved", "resources"];

/// A named, swappable transformation of the structured report.
pub trait StyleTransform: Send + Sync {
    fn name(&self) -> &str;
    fn transform(&self, document: &ReportDocument) -> Result<String>;
}

/// Template-driven style.
#[derive(Debug, Clone)]
pub struct TemplateStyle {
    name: String,
    template: String,
    placeholder: Regex,
}

impl TemplateStyle {
    /// The bundled HTML style.
    pub fn builtin() -> Result<Self> {
        Self::from_template(DEFAULT_STYLE_NAME, DEFAULT_TEMPLATE)
    }

    /// Load a caller-supplied template; unreadable files are configuration errors.
    pub fn from_file(path: &Path) -> Result<Self> {
        let template = fs::read_to_string(path).map_err(|e| {
            AuditError::config_at(
                format!("cannot read stylesheet {}: {}", path.display(), e),
                path,
            )
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_template(&name, &template).map_err(|err| match err {
            AuditError::Configuration { message, .. } => AuditError::config_at(message, path),
            other => other,
        })
    }

    /// Validate that every placeholder in `template` is known.
    pub fn from_template(name: &str, template: &str) -> Result<Self> {
        let placeholder = Regex::new(PLACEHOLDER_PATTERN).map_err(AuditError::render)?;

        let unknown: Vec<String> = placeholder
            .captures_iter(template)
            .map(|caps| caps[1].to_string())
            .filter(|slot| !PLACEHOLDERS.contains(&slot.as_str()))
            .collect();
        if !unknown.is_empty() {
            return Err(AuditError::config(format!(
                "stylesheet '{}' uses unknown placeholder(s): {}",
                name,
                unknown.join(", ")
            )));
        }

        Ok(Self {
            name: name.to_string(),
            template: template.to_string(),
            placeholder,
        })
    }

    /// Resolve the configured style: a template file, or the bundled default.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }
}

impl StyleTransform for TemplateStyle {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, document: &ReportDocument) -> Result<String> {
        let slots = fill_slots(document);
        let rendered = self.placeholder.replace_all(&self.template, |caps: &Captures| {
            slots.get(&caps[1]).cloned().unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}

fn fill_slots(document: &ReportDocument) -> IndexMap<&'static str, String> {
    let mut slots = IndexMap::new();
    let summary = &document.summary;

    slots.insert("title", "Release Audit Report".to_string());
    slots.insert(
        "summary",
        format!(
            "<ul class=\"summary\">\n\
             <li><span class=\"count\">{}</span> files</li>\n\
             <li><span class=\"count\">{}</span> approved</li>\n\
             <li><span class=\"count\">{}</span> unapproved</li>\n\
             <li><span class=\"count\">{}</span> unknown</li>\n\
             <li><span class=\"count\">{}</span> unreadable</li>\n\
             </ul>",
            summary.total, summary.approved, summary.unapproved, summary.unknown, summary.read_errors
        ),
    );

    let families: Vec<String> = document
        .families
        .iter()
        .map(|f| {
            format!(
                "<tr><td><code>{}</code></td><td>{}</td><td>{}</td></tr>",
                escape(f.category.as_str()),
                escape(f.name.as_str()),
                f.count
            )
        })
        .collect();
    slots.insert("families", families.join("\n"));

    let unapproved = document.unapproved_paths();
    let unapproved_html = if unapproved.is_empty() {
        "<p>None. All files have approved licenses.</p>".to_string()
    } else {
        let items: Vec<String> = unapproved
            .iter()
            .map(|p| format!("<li><code>{}</code></li>", escape(*p)))
            .collect();
        format!("<ul>\n{}\n</ul>", items.join("\n"))
    };
    slots.insert("unapproved", unapproved_html);

    let resources: Vec<String> = document
        .resources
        .iter()
        .map(|r| {
            let approved = r.is_approved();
            format!(
                "<tr class=\"{}\"><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td></tr>",
                if approved { "approved" } else { "unapproved" },
                escape(r.name.as_str()),
                escape(r.kind.as_str()),
                escape(r.family_label().as_str()),
                if approved { "yes" } else { "no" }
            )
        })
        .collect();
    slots.insert("resources", resources.join("\n"));

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::xml::{DocumentSummary, Outcome, ResourceEntry};
    use tempfile::tempdir;

    fn document() -> ReportDocument {
        ReportDocument {
            resources: vec![
                ResourceEntry {
                    name: "a<b>.txt".to_string(),
                    kind: "standard".to_string(),
                    outcomes: vec![
                        Outcome::HeaderType("?????".to_string()),
                        Outcome::Approval(false),
                    ],
                },
                ResourceEntry {
                    name: "Main.java".to_string(),
                    kind: "standard".to_string(),
                    outcomes: vec![
                        Outcome::LicenseFamily("Apache License Version 2.0".to_string()),
                        Outcome::Approval(true),
                    ],
                },
            ],
            summary: DocumentSummary {
                approved: 1,
                unapproved: 1,
                unknown: 1,
                read_errors: 0,
                total: 2,
            },
            families: vec![],
        }
    }

    #[test]
    fn test_builtin_style_renders_html() {
        let style = TemplateStyle::builtin().unwrap();
        assert_eq!(style.name(), "default");

        let html = style.transform(&document()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Release Audit Report</title>"));
        assert!(html.contains("<li><code>a&lt;b&gt;.txt</code></li>"));
        assert!(html.contains("<tr class=\"unapproved\"><td><code>a&lt;b&gt;.txt</code></td>"));
        assert!(html.contains("Apache License Version 2.0"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_custom_template_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("compact.tpl");
        fs::write(&path, "# {{ title }}\nUNAPPROVED:\n{{unapproved}}\n").unwrap();

        let style = TemplateStyle::resolve(Some(&path)).unwrap();
        assert_eq!(style.name(), "compact.tpl");
        let out = style.transform(&document()).unwrap();
        assert!(out.starts_with("# Release Audit Report\nUNAPPROVED:\n<ul>"));
    }

    #[test]
    fn test_unknown_placeholder_is_config_error() {
        let err = TemplateStyle::from_template("bad", "{{title}} {{colour}}").unwrap_err();
        assert!(matches!(err, AuditError::Configuration { .. }));
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_missing_stylesheet_is_config_error() {
        let dir = tempdir().unwrap();
        let err = TemplateStyle::resolve(Some(&dir.path().join("missing.xsl"))).unwrap_err();
        assert!(matches!(err, AuditError::Configuration { .. }));
    }
}
