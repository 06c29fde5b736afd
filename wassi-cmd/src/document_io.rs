//! Reading and writing document snapshots.
//!
//! Documents are JSON; a path ending in `.gz` is gzip-compressed.

use anyhow::Context;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{info, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use wassi_model::document::Document;
use wassi_model::water_use::find_exact_duplicates;

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

pub fn load_document(path: &Path) -> anyhow::Result<Document> {
    let file = File::open(path).with_context(|| format!("opening document {}", path.display()))?;
    let reader: Box<dyn Read> = if is_gzip(path) {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    let doc: Document = serde_json::from_reader(BufReader::new(reader))
        .with_context(|| format!("parsing document {}", path.display()))?;
    info!(
        "Loaded {}: {} counties, {} hydrologic units, {} sub-units, {} water-use records",
        path.display(),
        doc.counties.len(),
        doc.hydrologic_units.len(),
        doc.sub_units.len(),
        doc.water_use.len()
    );
    Ok(doc)
}

/// Write `doc` to `path`, warning about exact duplicate water-use records first.
pub fn save_document(doc: &Document, path: &Path) -> anyhow::Result<()> {
    for i in find_exact_duplicates(&doc.water_use) {
        let record = &doc.water_use[i];
        warn!(
            "Duplicate water-use record {} at {} ({} {} {})",
            record.id, record.location, record.year, record.sector, record.source
        );
    }

    let file = File::create(path).with_context(|| format!("creating document {}", path.display()))?;
    if is_gzip(path) {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, doc)?;
        encoder.finish()?.flush()?;
    } else {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, doc)?;
        writer.flush()?;
    }
    info!("Saved {}", path.display());
    Ok(())
}
