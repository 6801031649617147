//! Structured XML report: writer and reader.
//!
//! Each scanned file is a `<resource>` carrying an ordered list of outcome
//! elements. Readers accept repeated outcomes per resource so that reports
//! written by older tools still load.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use super::FrozenReport;
use crate::audit::{Claim, ClaimOutcome};
use crate::error::{AuditError, Result};

/// Header type written for files no matcher recognized.
pub const UNKNOWN_HEADER_TYPE: &str = "?????";

/// Render the structured report. Output is a pure function of the report.
pub fn render(report: &FrozenReport) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(AuditError::render)?;
    writer
        .write_event(Event::Start(BytesStart::new("rat-report")))
        .map_err(AuditError::render)?;

    for claim in report.claims() {
        write_resource(&mut writer, claim)?;
    }
    write_statistics(&mut writer, report)?;

    writer
        .write_event(Event::End(BytesEnd::new("rat-report")))
        .map_err(AuditError::render)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(AuditError::render)?;
    xml.push('\n');
    Ok(xml)
}

fn write_resource(writer: &mut Writer<Vec<u8>>, claim: &Claim) -> Result<()> {
    let kind = claim.kind.as_str();
    let name = sanitize_text(&claim.path);
    writer
        .write_event(Event::Start(
            BytesStart::new("resource").with_attributes([("name", name.as_str()), ("type", kind)]),
        ))
        .map_err(AuditError::render)?;

    if let Some(sample) = &claim.header_sample {
        let sample = sanitize_text(sample);
        writer
            .write_event(Event::Start(BytesStart::new("header-sample")))
            .map_err(AuditError::render)?;
        writer
            .write_event(Event::Text(BytesText::new(&sample)))
            .map_err(AuditError::render)?;
        writer
            .write_event(Event::End(BytesEnd::new("header-sample")))
            .map_err(AuditError::render)?;
    }

    match &claim.outcome {
        ClaimOutcome::Family { family } => {
            write_empty(writer, "header-type", &[("name", family.category.as_str())])?;
            write_empty(writer, "license-family", &[("name", family.name.as_str())])?;
        }
        ClaimOutcome::Unknown => {
            write_empty(writer, "header-type", &[("name", UNKNOWN_HEADER_TYPE)])?;
        }
        ClaimOutcome::ReadError { reason } => {
            write_empty(writer, "read-error", &[("reason", reason.as_str())])?;
        }
    }

    let approved = if claim.approved { "true" } else { "false" };
    write_empty(writer, "license-approval", &[("name", approved)])?;
    write_empty(writer, "type", &[("name", kind)])?;

    writer
        .write_event(Event::End(BytesEnd::new("resource")))
        .map_err(AuditError::render)?;
    Ok(())
}

fn write_statistics(writer: &mut Writer<Vec<u8>>, report: &FrozenReport) -> Result<()> {
    let stats = report.statistics();
    let approved = stats.num_approved.to_string();
    let unapproved = stats.num_unapproved.to_string();
    let unknown = stats.num_unknown.to_string();
    let read_errors = stats.num_read_errors.to_string();
    let total = stats.num_total.to_string();

    writer
        .write_event(Event::Start(BytesStart::new("statistics").with_attributes([
            ("approved", approved.as_str()),
            ("unapproved", unapproved.as_str()),
            ("unknown", unknown.as_str()),
            ("read-errors", read_errors.as_str()),
            ("total", total.as_str()),
        ])))
        .map_err(AuditError::render)?;

    for (family, count) in &stats.family_counts {
        let count = count.to_string();
        write_empty(
            writer,
            "family",
            &[
                ("category", family.category.as_str()),
                ("name", family.name.as_str()),
                ("count", count.as_str()),
            ],
        )?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("statistics")))
        .map_err(AuditError::render)?;
    Ok(())
}

fn write_empty(writer: &mut Writer<Vec<u8>>, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let values: Vec<String> = attrs.iter().map(|(_, value)| sanitize_text(value)).collect();
    writer
        .write_event(Event::Empty(BytesStart::new(name).with_attributes(
            attrs.iter().zip(&values).map(|((key, _), value)| (*key, value.as_str())),
        )))
        .map_err(AuditError::render)
}

/// XML 1.0 forbids most control characters, even escaped.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_control() && !matches!(c, '\n' | '\t' | '\r') {
                '\u{FFFD}'
            } else {
                c
            }
        })
        .collect()
}

/// One classification entry of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    HeaderSample,
    HeaderType(String),
    LicenseFamily(String),
    Approval(bool),
    DocumentType(String),
    ReadError(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceEntry {
    pub name: String,
    pub kind: String,
    pub outcomes: Vec<Outcome>,
}

impl ResourceEntry {
    /// A resource is unapproved as soon as one approval entry says so.
    pub fn is_approved(&self) -> bool {
        !self.outcomes.iter().any(|o| *o == Outcome::Approval(false))
    }

    pub fn family_name(&self) -> Option<&str> {
        self.outcomes.iter().find_map(|o| match o {
            Outcome::LicenseFamily(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn header_type(&self) -> Option<&str> {
        self.outcomes.iter().find_map(|o| match o {
            Outcome::HeaderType(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn read_error(&self) -> Option<&str> {
        self.outcomes.iter().find_map(|o| match o {
            Outcome::ReadError(reason) => Some(reason.as_str()),
            _ => None,
        })
    }

    /// Family name, or a placeholder describing why there is none.
    pub fn family_label(&self) -> String {
        if let Some(name) = self.family_name() {
            name.to_string()
        } else if let Some(reason) = self.read_error() {
            format!("unreadable ({})", reason)
        } else {
            "unknown".to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentSummary {
    pub approved: usize,
    pub unapproved: usize,
    pub unknown: usize,
    pub read_errors: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyCount {
    pub category: String,
    pub name: String,
    pub count: usize,
}

/// Structured report loaded back into memory; input of style transforms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportDocument {
    pub resources: Vec<ResourceEntry>,
    pub summary: DocumentSummary,
    pub families: Vec<FamilyCount>,
}

impl ReportDocument {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut document = ReportDocument::default();
        let mut current: Option<ResourceEntry> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"resource" => current = Some(parse_resource(e)?),
                    b"header-sample" => {
                        if let Some(resource) = current.as_mut() {
                            resource.outcomes.push(Outcome::HeaderSample);
                        }
                    }
                    b"statistics" => document.summary = parse_summary(e)?,
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"resource" => document.resources.push(parse_resource(e)?),
                    b"statistics" => document.summary = parse_summary(e)?,
                    b"family" => document.families.push(FamilyCount {
                        category: require_attr(e, b"category")?,
                        name: require_attr(e, b"name")?,
                        count: parse_count(e, b"count")?,
                    }),
                    name => {
                        if let Some(resource) = current.as_mut() {
                            if let Some(outcome) = parse_outcome(name, e)? {
                                resource.outcomes.push(outcome);
                            }
                        }
                    }
                },
                Ok(Event::End(ref e)) => {
                    if e.name().as_ref() == b"resource" {
                        if let Some(resource) = current.take() {
                            document.resources.push(resource);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(AuditError::render(format!(
                        "malformed structured report: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok(document)
    }

    /// Names of unapproved resources, sorted.
    pub fn unapproved_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .resources
            .iter()
            .filter(|r| !r.is_approved())
            .map(|r| r.name.as_str())
            .collect();
        paths.sort();
        paths
    }
}

fn parse_resource(e: &BytesStart) -> Result<ResourceEntry> {
    Ok(ResourceEntry {
        name: require_attr(e, b"name")?,
        kind: get_attr(e, b"type")?.unwrap_or_else(|| "standard".to_string()),
        outcomes: Vec::new(),
    })
}

fn parse_outcome(name: &[u8], e: &BytesStart) -> Result<Option<Outcome>> {
    let outcome = match name {
        b"header-type" => Outcome::HeaderType(require_attr(e, b"name")?),
        b"license-family" => Outcome::LicenseFamily(require_attr(e, b"name")?),
        b"license-approval" => Outcome::Approval(require_attr(e, b"name")? == "true"),
        b"type" => Outcome::DocumentType(require_attr(e, b"name")?),
        b"read-error" => Outcome::ReadError(require_attr(e, b"reason")?),
        _ => return Ok(None),
    };
    Ok(Some(outcome))
}

fn parse_summary(e: &BytesStart) -> Result<DocumentSummary> {
    Ok(DocumentSummary {
        approved: parse_count(e, b"approved")?,
        unapproved: parse_count(e, b"unapproved")?,
        unknown: parse_count(e, b"unknown")?,
        read_errors: parse_count(e, b"read-errors")?,
        total: parse_count(e, b"total")?,
    })
}

fn parse_count(e: &BytesStart, name: &[u8]) -> Result<usize> {
    match get_attr(e, name)? {
        Some(value) => value.parse().map_err(|_| {
            AuditError::render(format!(
                "invalid count '{}' for attribute {}",
                value,
                String::from_utf8_lossy(name)
            ))
        }),
        None => Ok(0),
    }
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| AuditError::render(format!("invalid attribute: {}", e)))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| AuditError::render(format!("invalid attribute value: {}", e)))?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

fn require_attr(e: &BytesStart, name: &[u8]) -> Result<String> {
    get_attr(e, name)?.ok_or_else(|| {
        AuditError::render(format!(
            "missing required attribute: {}",
            String::from_utf8_lossy(name)
        ))
    })
}
