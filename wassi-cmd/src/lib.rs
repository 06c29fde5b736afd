//! Command implementations for the WaSSI CLI.
//!
//! Every command loads a document snapshot, derives the next one and
//! writes it back, either over the input or to `--output`.

use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use wassi_model::analysis::Analysis;

pub mod document_io;
pub mod export;
pub mod import;
pub mod pipeline;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_support;

/// Input and output document paths.
#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
    /// Document to read (JSON, or gzip-compressed JSON ending in .gz)
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Where to write the result; defaults to the input path
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

impl DocumentArgs {
    pub fn output_path(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.input)
    }
}

/// Command-line overrides of the analysis stored in the document.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisOverrides {
    /// Year of the crop-area data
    #[arg(long)]
    pub crop_year: Option<i32>,

    /// Year of the developed-area data
    #[arg(long)]
    pub developed_area_year: Option<i32>,

    /// Year of the well inventory
    #[arg(long)]
    pub well_year: Option<i32>,

    /// Year of the water-use records
    #[arg(long)]
    pub water_use_year: Option<i32>,

    /// Share of streamflow reserved for ecological needs, in [0, 1)
    #[arg(short = 'e', long)]
    pub environmental_flow_fraction: Option<f64>,
}

impl AnalysisOverrides {
    pub fn apply(&self, analysis: &mut Analysis) -> wassi_model::Result<()> {
        if let Some(year) = self.crop_year {
            analysis.crop_year = year;
        }
        if let Some(year) = self.developed_area_year {
            analysis.developed_area_year = year;
        }
        if let Some(year) = self.well_year {
            analysis.well_year = year;
        }
        if let Some(year) = self.water_use_year {
            analysis.water_use_year = year;
        }
        if let Some(e) = self.environmental_flow_fraction {
            analysis.environmental_flow_fraction = e;
        }
        analysis.validate()
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute sub-unit weights for every county
    Weights {
        #[command(flatten)]
        document: DocumentArgs,

        #[command(flatten)]
        overrides: AnalysisOverrides,

        /// Replace prior weight records instead of appending
        #[arg(long)]
        overwrite: bool,

        /// Log the per-county weight sums
        #[arg(long)]
        report: bool,
    },

    /// Split county water-use records over sub-units
    Disaggregate {
        #[command(flatten)]
        document: DocumentArgs,

        #[command(flatten)]
        overrides: AnalysisOverrides,

        /// Replace prior disaggregated records instead of adding to them
        #[arg(long)]
        overwrite: bool,
    },

    /// Compute water supply stress indices per hydrologic unit
    Stress {
        #[command(flatten)]
        document: DocumentArgs,

        #[command(flatten)]
        overrides: AnalysisOverrides,

        /// Replace prior stress values instead of appending
        #[arg(long)]
        overwrite: bool,
    },

    /// Weights, disaggregation and stress in order
    Run {
        #[command(flatten)]
        document: DocumentArgs,

        #[command(flatten)]
        overrides: AnalysisOverrides,

        /// Replace prior derived data instead of appending
        #[arg(long)]
        overwrite: bool,
    },

    /// Append county water-use records from a CSV
    /// (county,sector,source,water_type,consumptive,year,value)
    ImportWaterUse {
        #[command(flatten)]
        document: DocumentArgs,

        /// CSV file to import
        #[arg(short = 'c', long)]
        csv: PathBuf,
    },

    /// Write stress values and/or sub-county water use to CSV
    Export {
        /// Document to read
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Output path for stress values (huc,sector,source,value)
        #[arg(short = 's', long)]
        stress_csv: Option<PathBuf>,

        /// Output path for hydrologic-unit and sub-unit water-use records
        #[arg(short = 'w', long)]
        water_use_csv: Option<PathBuf>,
    },

    /// Log counts of entities, records and stress values
    Summary {
        /// Document to read
        #[arg(short = 'i', long)]
        input: PathBuf,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Weights {
            document,
            overrides,
            overwrite,
            report,
        } => pipeline::execute(&document, &overrides, |doc| {
            let doc = pipeline::run_weights(doc, overwrite)?;
            if report {
                pipeline::log_weight_report(&doc);
            }
            Ok(doc)
        }),
        Command::Disaggregate {
            document,
            overrides,
            overwrite,
        } => pipeline::execute(&document, &overrides, |doc| {
            pipeline::run_disaggregation(doc, overwrite)
        }),
        Command::Stress {
            document,
            overrides,
            overwrite,
        } => pipeline::execute(&document, &overrides, |doc| pipeline::run_stress(doc, overwrite)),
        Command::Run {
            document,
            overrides,
            overwrite,
        } => pipeline::execute(&document, &overrides, |doc| pipeline::run_all(doc, overwrite)),
        Command::ImportWaterUse { document, csv } => import::run_import(&document, &csv),
        Command::Export {
            input,
            stress_csv,
            water_use_csv,
        } => export::run_export(&input, stress_csv.as_deref(), water_use_csv.as_deref()),
        Command::Summary { input } => summary::run_summary(&input),
    }
}
