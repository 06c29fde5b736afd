//! The three analysis components applied to document snapshots.

use crate::document_io::{load_document, save_document};
use crate::{AnalysisOverrides, DocumentArgs};
use chrono::Local;
use log::info;
use wassi_engine::disaggregation::disaggregate;
use wassi_engine::stress::compute_stress;
use wassi_engine::weights::{compute_weights, WeightSums};
use wassi_model::document::Document;

/// Load, apply overrides, derive with `step`, stamp and save.
pub fn execute<F>(args: &DocumentArgs, overrides: &AnalysisOverrides, step: F) -> anyhow::Result<()>
where
    F: FnOnce(Document) -> anyhow::Result<Document>,
{
    let mut doc = load_document(&args.input)?;
    overrides.apply(&mut doc.analysis)?;
    let mut doc = step(doc)?;
    doc.analysis.last_run = Some(Local::now().naive_local());
    save_document(&doc, args.output_path())
}

pub fn run_weights(doc: Document, overwrite: bool) -> anyhow::Result<Document> {
    let table = compute_weights(&doc)?;
    Ok(doc.with_disaggregation_records(table, overwrite))
}

pub fn run_disaggregation(doc: Document, overwrite: bool) -> anyhow::Result<Document> {
    let output = disaggregate(&doc)?;
    Ok(doc.with_disaggregated_water_use(output.records, overwrite))
}

pub fn run_stress(doc: Document, overwrite: bool) -> anyhow::Result<Document> {
    let output = compute_stress(&doc)?;
    Ok(doc.with_stress_values(output.values, overwrite))
}

/// Weights, then disaggregation, then stress; each sees the previous result.
pub fn run_all(doc: Document, overwrite: bool) -> anyhow::Result<Document> {
    let doc = run_weights(doc, overwrite)?;
    let doc = run_disaggregation(doc, overwrite)?;
    let doc = run_stress(doc, overwrite)?;
    info!("Analysis {} complete", doc.analysis.name);
    Ok(doc)
}

/// One line of weight sums per county.
pub fn weight_report(doc: &Document) -> Vec<String> {
    doc.analysis
        .disaggregation
        .iter()
        .map(|(county, records)| format!("{county}: {}", WeightSums::of(records)))
        .collect()
}

pub fn log_weight_report(doc: &Document) {
    for line in weight_report(doc) {
        info!("{line}");
    }
}
