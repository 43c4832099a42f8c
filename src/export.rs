use std::path::Path;

use anyhow::Result;
use log::{info, warn};

use crate::charts::DashboardCharts;
use crate::cli::Flags;
use crate::data::cache::load_cached;
use crate::data::pipeline::{self, PipelineOutput};

/// What a headless export did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Specs written, built from this many rows of the selected year.
    Written { year_rows: usize },
    /// The selection matched nothing; no file was written.
    NoObservations,
}

/// Load the dataset named by `flags`, run the pipeline once and write the
/// three chart specs to `out`.
pub fn export_charts(flags: &Flags, out: &Path) -> Result<ExportOutcome> {
    let dataset = load_cached(&flags.data_path)?;
    let selection = flags.selection_for(&dataset);

    let views = match pipeline::run(&dataset, &selection) {
        PipelineOutput::Views(views) => views,
        PipelineOutput::NoObservations => {
            warn!("No observations found for the chosen filters; nothing exported");
            return Ok(ExportOutcome::NoObservations);
        }
    };

    let charts = DashboardCharts::build(&dataset, &selection, &views);
    charts.write_json(out)?;
    info!("Wrote chart specs for {} to {}", selection.year, out.display());

    Ok(ExportOutcome::Written {
        year_rows: views.year_rows.len(),
    })
}
