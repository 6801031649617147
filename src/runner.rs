//! One audit pass: collect claims, aggregate, render, decide.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use crate::audit::{discover_files, Auditor, Statistics};
use crate::config::AuditSettings;
use crate::error::{AuditError, Result};
use crate::exclusion::ExclusionFilter;
use crate::license::MatcherPipeline;
use crate::policy::ApprovalPolicy;
use crate::report::{
    plain, xml, FrozenReport, RenderedReports, ReportDocument, ReportModel, ReportPaths,
    StyleTransform, TemplateStyle,
};

/// Phases of a run, entered strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    Collecting,
    Aggregating,
    Rendering,
    Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail { unapproved: usize, report: PathBuf },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub verdict: Verdict,
    pub statistics: Statistics,
    pub reports: RenderedReports,
    pub paths: ReportPaths,
    /// Unapproved files, sorted, as read back from the structured report
    pub unapproved_files: Vec<String>,
}

/// Orchestrates the audit for one immutable set of settings.
pub struct AuditRunner {
    settings: AuditSettings,
    exclusions: ExclusionFilter,
    pipeline: MatcherPipeline,
    policy: ApprovalPolicy,
    style: Box<dyn StyleTransform>,
}

impl AuditRunner {
    /// Compile exclusions, matchers, approval policy and style up front so
    /// configuration problems surface before any file is read.
    pub fn new(settings: AuditSettings) -> Result<Self> {
        let exclusions = ExclusionFilter::from_file(settings.exclude_file.as_deref())?;
        let pipeline =
            MatcherPipeline::new(settings.add_default_matchers, &settings.substring_matchers)?;
        let policy = ApprovalPolicy::from_names(&settings.approved_licenses)?;
        let style = TemplateStyle::resolve(settings.stylesheet.as_deref())?;

        debug!(
            exclusions = exclusions.len(),
            matchers = pipeline.matchers().len(),
            style = style.name(),
            "audit runner configured"
        );

        Ok(Self {
            settings,
            exclusions,
            pipeline,
            policy,
            style: Box::new(style),
        })
    }

    /// Swap the style transform.
    pub fn with_style(mut self, style: Box<dyn StyleTransform>) -> Self {
        self.style = style;
        self
    }

    pub fn settings(&self) -> &AuditSettings {
        &self.settings
    }

    /// Discover files under the root with the host patterns, then run.
    pub fn run_discovered(&self) -> Result<AuditOutcome> {
        let files = discover_files(
            &self.settings.root,
            &self.settings.includes,
            &self.settings.excludes,
            Some(&self.settings.report_dir),
        )?;
        self.run(&files)
    }

    pub fn run(&self, files: &[PathBuf]) -> Result<AuditOutcome> {
        let mut state = RunState::Collecting;
        debug!(files = files.len(), state = ?state, "audit started");

        let mut model = ReportModel::new();
        let auditor = Auditor::new(
            &self.settings.root,
            &self.exclusions,
            &self.pipeline,
            &self.policy,
        );
        model.extend(auditor.run(files));

        advance(&mut state, RunState::Aggregating);
        let report = model.freeze();

        advance(&mut state, RunState::Rendering);
        let paths = ReportPaths::in_dir(&self.settings.report_dir);
        let (reports, document) = self.render(&report)?;
        write_reports(&self.settings.report_dir, &paths, &reports)?;

        advance(&mut state, RunState::Verdict);
        let statistics = report.statistics().clone();
        let unapproved_files: Vec<String> = document
            .unapproved_paths()
            .into_iter()
            .map(str::to_string)
            .collect();

        info!(
            total = statistics.num_total,
            approved = statistics.num_approved,
            unapproved = statistics.num_unapproved,
            unknown = statistics.num_unknown,
            "audit finished"
        );

        if self.settings.verbose {
            eprint!("{}", reports.plain);
        }

        let verdict = if statistics.has_unapproved() {
            let report_path = display_path(&paths.styled);
            if self.settings.verbose {
                eprint!("{}", verbose_failure_output(&document));
            }
            let message = failure_message(statistics.num_unapproved, &report_path);
            if self.settings.fail_on_error {
                return Err(AuditError::AuditFailure {
                    unapproved: statistics.num_unapproved,
                    report: report_path,
                    message,
                });
            }
            warn!(unapproved = statistics.num_unapproved, "audit failure ignored, fail_on_error is off");
            eprintln!("{}", message);
            Verdict::Fail {
                unapproved: statistics.num_unapproved,
                report: report_path,
            }
        } else {
            Verdict::Pass
        };

        Ok(AuditOutcome {
            verdict,
            statistics,
            reports,
            paths,
            unapproved_files,
        })
    }

    /// Structured first; plain and styled only read the frozen model and
    /// the structured document, so they run side by side.
    fn render(&self, report: &FrozenReport) -> Result<(RenderedReports, ReportDocument)> {
        let structured = xml::render(report)?;
        let document = ReportDocument::parse(&structured)?;

        let (plain, styled) = rayon::join(
            || plain::render(report),
            || self.style.transform(&document),
        );
        let styled = styled.map_err(|err| match err {
            AuditError::Configuration { .. } => err,
            other => AuditError::Render(format!("style '{}': {}", self.style.name(), other)),
        })?;

        Ok((
            RenderedReports {
                structured,
                plain,
                styled,
            },
            document,
        ))
    }
}

fn advance(state: &mut RunState, next: RunState) {
    debug_assert!(next > *state, "run states only move forward");
    debug!(from = ?*state, to = ?next, "audit state");
    *state = next;
}

fn write_reports(dir: &Path, paths: &ReportPaths, reports: &RenderedReports) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| AuditError::io(dir, e))?;
    for (path, content) in [
        (&paths.structured, &reports.structured),
        (&paths.plain, &reports.plain),
        (&paths.styled, &reports.styled),
    ] {
        fs::write(path, content).map_err(|e| AuditError::io(path, e))?;
    }
    Ok(())
}

fn display_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

pub fn failure_message(unapproved: usize, report: &Path) -> String {
    format!(
        "Rat audit failure - {} unapproved license{}\n\tSee file://{}",
        unapproved,
        if unapproved > 1 { "s" } else { "" },
        report.display()
    )
}

/// Unapproved resources of the structured report, sorted, with the family
/// each was classified as.
pub fn verbose_failure_output(document: &ReportDocument) -> String {
    let mut unapproved: Vec<_> = document.resources.iter().filter(|r| !r.is_approved()).collect();
    unapproved.sort_by(|a, b| a.name.cmp(&b.name));

    let mut output = String::from("Files with unapproved licenses:\n");
    for resource in unapproved {
        output.push_str(&format!(" - {} ({})\n", resource.name, resource.family_label()));
    }
    output
}
