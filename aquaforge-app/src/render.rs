//! Turns verdicts and notices into terminal text or JSON.

use anyhow::Result;
use aquaforge_core::{
    batch::{BatchSummary, VerdictRow},
    content,
};
use aquaforge_schemas::{
    bloom::{BloomSeverityVerdict, BoundingBox},
    water::{WaterQualityStatus, WaterQualityVerdict, WaterSample},
};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message rendered in place of a result, e.g. a failed analysis.
#[derive(Debug, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct WaterReport<'a> {
    pub sample: &'a WaterSample,
    pub verdict: &'a WaterQualityVerdict,
}

#[derive(Debug, Serialize)]
pub struct BloomReport {
    pub image: PathBuf,
    pub annotated_image: Option<PathBuf>,
    pub regions: Vec<BoundingBox>,
    pub verdict: BloomSeverityVerdict,
}

#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub source: &'a str,
    pub output: Option<&'a str>,
    pub summary: &'a BatchSummary,
    /// Set when the rows were not written to a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdicts: Option<&'a [VerdictRow]>,
}

pub fn water(report: &WaterReport<'_>, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return json(report);
    }
    let mut out = String::new();
    writeln!(out, "Water Quality Status: {}", report.verdict.status)?;
    // Unrounded; Debug keeps the trailing ".0".
    writeln!(out, "  pH:    {:?}", report.sample.ph)?;
    writeln!(out, "  Color: {}", report.sample.color)?;
    writeln!(out, "  Smell: {}", report.sample.smell)?;
    writeln!(out)?;
    bullet_list(&mut out, "Recommendations", report.verdict.recommendations.iter())?;
    Ok(out)
}

pub fn bloom(report: &BloomReport, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return json(report);
    }
    let mut out = String::new();
    writeln!(out, "[{}]", report.image.display())?;
    if report.verdict.severity.is_bloom() {
        writeln!(out, "Algal Bloom Detected")?;
        writeln!(out, "  Detected Regions: {}", report.verdict.region_count)?;
        writeln!(out, "  Severity: {}", report.verdict.severity)?;
    } else {
        writeln!(out, "No Algal Bloom Detected")?;
    }
    if let Some(path) = &report.annotated_image {
        writeln!(out, "  Detection Result: {}", path.display())?;
    }
    writeln!(out)?;
    let heading = if report.verdict.severity.is_bloom() { "Immediate Actions" } else { "Condition" };
    bullet_list(&mut out, heading, report.verdict.guidance.iter())?;
    Ok(out)
}

pub fn batch(report: &BatchReport<'_>, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return json(report);
    }
    let mut out = String::new();
    writeln!(out, "Assessed {} samples from {}", report.summary.samples, report.source)?;
    for status in [WaterQualityStatus::Good, WaterQualityStatus::Moderate, WaterQualityStatus::Critical] {
        writeln!(out, "  {:<9} {}", status.to_string(), report.summary.count(status))?;
    }
    if let Some(output) = report.output {
        writeln!(out, "Verdicts written to {}", output)?;
    }
    Ok(out)
}

pub fn notice(notice: &Notice, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return json(notice);
    }
    let prefix = match notice.level {
        NoticeLevel::Info => "Note",
        NoticeLevel::Error => "Error",
    };
    Ok(format!("{}: {}\n", prefix, notice.message))
}

pub fn ppe(format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let sections: Vec<_> = content::PPE_SECTIONS
            .iter()
            .map(|s| serde_json::json!({ "heading": s.heading, "items": s.items }))
            .collect();
        return json(&serde_json::json!({ "title": content::PPE_HEADING, "sections": sections }));
    }
    let mut out = String::new();
    writeln!(out, "{}", content::PPE_HEADING)?;
    writeln!(out)?;
    for section in &content::PPE_SECTIONS {
        bullet_list(&mut out, section.heading, section.items.iter())?;
        writeln!(out)?;
    }
    Ok(out)
}

pub fn about(detection_status: &str, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return json(&serde_json::json!({
            "title": content::APP_TITLE,
            "info": content::SIDEBAR_INFO,
            "detection": detection_status,
            "footer": content::FOOTER,
        }));
    }
    let mut out = String::new();
    writeln!(out, "{}", content::APP_TITLE)?;
    writeln!(out, "{}", content::SIDEBAR_INFO)?;
    writeln!(out, "Detection: {}", detection_status)?;
    writeln!(out, "---")?;
    for line in content::FOOTER {
        writeln!(out, "{}", line)?;
    }
    Ok(out)
}

fn bullet_list<T: AsRef<str>>(out: &mut String, heading: &str, items: impl Iterator<Item = T>) -> Result<()> {
    writeln!(out, "{}", heading)?;
    for item in items {
        writeln!(out, "  - {}", item.as_ref())?;
    }
    Ok(())
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}
