//! Output Rendering
//!
//! Renders a resolution result as human-readable text or JSON.

use std::fmt::Write as _;
use std::path::Path;

use crate::domain::services::ResolvedHost;
use crate::domain::value_objects::OrderedUniqueList;
use crate::infrastructure::fs::FsStats;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything shown for one `resolve` run
#[derive(Debug, Clone)]
pub struct ResolveReport<'a> {
    pub app_dir: &'a Path,
    pub host: &'a ResolvedHost,
    pub is_portable: bool,
    /// File-system query tallies, shown in verbose mode
    pub fs_stats: Option<FsStats>,
}

/// Render a report in the requested format
pub fn render(report: &ResolveReport<'_>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => render_json(report),
    }
}

/// Text renderer
pub fn render_text(report: &ResolveReport<'_>) -> String {
    let mut out = String::new();
    let host = report.host;

    let _ = writeln!(out, "Application: {}", report.app_dir.display());
    let _ = writeln!(
        out,
        "Mode: {}",
        if report.is_portable {
            "portable (shared framework)"
        } else {
            "self-contained"
        }
    );
    let _ = writeln!(out, "Runtime loader directory: {}", host.clr_dir.display());

    section(&mut out, "Trusted platform assemblies", &host.tpa);
    section(&mut out, "Native search directories", &host.native);
    section(&mut out, "Resource search directories", &host.resources);

    if let Some(stats) = report.fs_stats {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "File system: {} existence checks, {} reads, {} listings, {} real paths",
            stats.existence_checks, stats.reads, stats.listings, stats.real_paths
        );
    }
    out
}

fn section(out: &mut String, title: &str, list: &OrderedUniqueList) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{} ({}):", title, list.len());
    for path in list.iter() {
        let _ = writeln!(out, "  {}", path.display());
    }
}

fn display_all(list: &OrderedUniqueList) -> Vec<String> {
    list.iter().map(|p| p.display().to_string()).collect()
}

/// JSON renderer
///
/// Carries both the individual entries and the joined strings handed to the
/// runtime.
pub fn render_json(report: &ResolveReport<'_>) -> String {
    let host = report.host;
    let paths = host.paths();
    let mut json = serde_json::json!({
        "app_dir": report.app_dir.display().to_string(),
        "portable": report.is_portable,
        "clr_dir": host.clr_dir.display().to_string(),
        "tpa": display_all(&host.tpa),
        "native": display_all(&host.native),
        "resources": display_all(&host.resources),
        "paths": paths,
    });
    if let (Some(stats), Some(object)) = (report.fs_stats, json.as_object_mut()) {
        object.insert(
            "fs_stats".to_string(),
            serde_json::to_value(stats).unwrap_or_default(),
        );
    }

    serde_json::to_string_pretty(&json).unwrap_or_default()
}
