use crate::{error::AquaforgeError, water_quality};
use aquaforge_schemas::water::{ColorDescriptor, SmellDescriptor, WaterQualityStatus, WaterSample};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use tracing::{debug, info};

/// One assessed sample, as written to the verdicts file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerdictRow {
    pub ph: f64,
    pub color: ColorDescriptor,
    pub smell: SmellDescriptor,
    pub status: WaterQualityStatus,
}

/// Per-status tallies for one batch run.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub samples: usize,
    pub by_status: BTreeMap<WaterQualityStatus, usize>,
}

impl BatchSummary {
    pub fn count(&self, status: WaterQualityStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Reads `ph,color,smell` rows from `input` and writes one verdict row per sample to `output`.
///
/// Readings are classified as given; off-scale values come out Critical rather
/// than being clamped. `source` only labels errors.
pub fn assess_csv<R: io::Read, W: io::Write>(
    source: &str,
    input: R,
    output: W,
) -> Result<BatchSummary, AquaforgeError> {
    let mut writer = csv::Writer::from_writer(output);
    let summary = assess_rows(source, input, |row| {
        writer
            .serialize(row)
            .map_err(|e| AquaforgeError::CsvError(source.to_string(), e))
    })?;
    writer
        .flush()
        .map_err(|e| AquaforgeError::FileIO(source.to_string(), e))?;
    Ok(summary)
}

/// Same as [`assess_csv`] but keeps the verdict rows in memory.
pub fn assess_records<R: io::Read>(
    source: &str,
    input: R,
) -> Result<(Vec<VerdictRow>, BatchSummary), AquaforgeError> {
    let mut rows = Vec::new();
    let summary = assess_rows(source, input, |row| {
        rows.push(row);
        Ok(())
    })?;
    Ok((rows, summary))
}

fn assess_rows<R, F>(source: &str, input: R, mut sink: F) -> Result<BatchSummary, AquaforgeError>
where
    R: io::Read,
    F: FnMut(VerdictRow) -> Result<(), AquaforgeError>,
{
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut summary = BatchSummary::default();

    for result in reader.deserialize() {
        let sample: WaterSample = result.map_err(|e| AquaforgeError::CsvError(source.to_string(), e))?;
        let verdict = water_quality::assess(&sample);
        debug!(row = summary.samples + 1, status = %verdict.status, "batch sample assessed");

        sink(VerdictRow {
            ph: sample.ph,
            color: sample.color,
            smell: sample.smell,
            status: verdict.status,
        })?;

        summary.samples += 1;
        *summary.by_status.entry(verdict.status).or_insert(0) += 1;
    }

    info!(samples = summary.samples, "batch assessment complete");
    Ok(summary)
}
