use log::{debug, warn};

use super::aggregate::{aggregate_by_continent, melt};
use super::filter::{continent_indices, year_indices};
use super::model::{AggregateRow, GapminderDataset, MetricValue, Selection};

/// The derived views for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViews {
    /// Per-continent aggregates for the selected year.
    pub aggregates: Vec<AggregateRow>,
    /// `aggregates` in long form, one row per (continent, metric).
    pub long_form: Vec<MetricValue>,
    /// Indices of the per-country rows for the selected year.
    pub year_rows: Vec<usize>,
    /// Indices of every row of the selected continents, all years.
    pub history: Vec<usize>,
}

/// Result of one pipeline run. An empty selection is an ordinary outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineOutput {
    /// No observation matches the selected year and continents.
    #[default]
    NoObservations,
    Views(DashboardViews),
}

impl PipelineOutput {
    pub fn views(&self) -> Option<&DashboardViews> {
        match self {
            PipelineOutput::Views(v) => Some(v),
            PipelineOutput::NoObservations => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PipelineOutput::NoObservations)
    }
}

/// Filter by continent, then by year, then aggregate. Pure: equal inputs
/// always give equal outputs.
pub fn run(dataset: &GapminderDataset, selection: &Selection) -> PipelineOutput {
    let history = continent_indices(dataset, selection);
    let year_rows = year_indices(dataset, &history, selection.year);

    if year_rows.is_empty() {
        warn!(
            "No observations for year {} and continents {:?}",
            selection.year, selection.continents
        );
        return PipelineOutput::NoObservations;
    }

    let aggregates = aggregate_by_continent(dataset, &year_rows);
    let long_form = melt(&aggregates);
    debug!(
        "Pipeline: {} history rows, {} rows in {}, {} continents",
        history.len(),
        year_rows.len(),
        selection.year,
        aggregates.len()
    );

    PipelineOutput::Views(DashboardViews {
        aggregates,
        long_form,
        year_rows,
        history,
    })
}
