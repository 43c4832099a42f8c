use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::charts::DashboardCharts;
use crate::color::ColorMap;
use crate::data::cache::load_cached;
use crate::data::model::{GapminderDataset, Selection};
use crate::data::pipeline::{self, PipelineOutput};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is opened).
    pub dataset: Option<Arc<GapminderDataset>>,

    /// Where `dataset` came from.
    pub source_path: Option<PathBuf>,

    /// Current year and continent choice.
    pub selection: Selection,

    /// Pipeline result for `selection` (cached until the selection changes).
    pub output: PipelineOutput,

    /// Chart specs built from `output`; None when it is empty.
    pub charts: Option<DashboardCharts>,

    /// Continent colours, fixed per dataset.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset with the default selection.
    pub fn set_dataset(&mut self, dataset: Arc<GapminderDataset>, path: PathBuf) {
        if dataset.is_empty() {
            log::warn!("{} contains no observations", path.display());
        }
        self.selection = Selection::default_for(&dataset);
        self.color_map = ColorMap::new(&dataset.continents);
        self.dataset = Some(dataset);
        self.source_path = Some(path);
        self.status_message = None;
        self.recompute();
    }

    /// Load `path` through the process-wide cache. On failure the current
    /// dataset stays and the error is shown in the status line.
    pub fn open_path(&mut self, path: &Path) -> bool {
        match load_cached(path) {
            Ok(dataset) => {
                self.set_dataset(dataset, path.to_path_buf());
                true
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
                false
            }
        }
    }

    /// Rerun the pipeline for the current selection and rebuild the charts.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            self.output = PipelineOutput::NoObservations;
            self.charts = None;
            return;
        };

        self.output = pipeline::run(ds, &self.selection);
        self.charts = self
            .output
            .views()
            .map(|views| DashboardCharts::build(ds, &self.selection, views));
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.recompute();
    }

    pub fn set_year(&mut self, year: i64) {
        if self.selection.year != year {
            self.selection.year = year;
            self.recompute();
        }
    }

    /// Toggle a single continent in the selection.
    pub fn toggle_continent(&mut self, continent: &str) {
        let selected = &mut self.selection.continents;
        if !selected.remove(continent) {
            selected.insert(continent.to_string());
        }
        self.recompute();
    }

    /// Select every continent of the dataset.
    pub fn select_all_continents(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.continents = ds.continents.clone();
            self.recompute();
        }
    }

    /// Clear the continent selection, which the pipeline reads as "all".
    pub fn select_no_continents(&mut self) {
        self.selection.continents.clear();
        self.recompute();
    }

    /// Rows behind the current charts: (selected year, all years).
    pub fn visible_rows(&self) -> (usize, usize) {
        self.output
            .views()
            .map(|v| (v.year_rows.len(), v.history.len()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(Arc::new(sample_dataset()), PathBuf::from("sample.csv"));
        state
    }

    #[test]
    fn new_dataset_starts_on_default_selection() {
        let state = loaded();
        assert_eq!(state.selection.year, 2007);
        assert_eq!(state.selection.continents.len(), 4);
        assert_eq!(state.visible_rows(), (5, 9));
        assert!(state.charts.is_some());
    }

    #[test]
    fn toggling_continents_recomputes() {
        let mut state = loaded();
        state.toggle_continent("Asia");
        let charts = state.charts.as_ref().unwrap();
        assert_eq!(charts.bar.categories, ["Africa", "Europe"]);

        state.toggle_continent("Asia");
        assert_eq!(state.charts.as_ref().unwrap().bar.categories.len(), 3);
    }

    #[test]
    fn empty_selection_clears_charts() {
        let mut state = loaded();
        state.set_selection(Selection {
            year: 2002,
            continents: ["Africa".to_string()].into(),
        });
        assert!(state.output.is_empty());
        assert!(state.charts.is_none());
        assert_eq!(state.visible_rows(), (0, 0));

        state.set_year(2007);
        assert!(state.charts.is_some());
    }

    #[test]
    fn selecting_none_behaves_like_all() {
        let mut state = loaded();
        let all = state.output.clone();
        state.select_no_continents();
        assert!(state.selection.continents.is_empty());
        assert_eq!(state.output, all);

        state.select_all_continents();
        assert_eq!(state.selection.continents.len(), 4);
    }

    #[test]
    fn failed_open_keeps_dataset_and_reports() {
        let mut state = loaded();
        assert!(!state.open_path(Path::new("/nonexistent/gapminder.csv")));
        assert!(state.dataset.is_some());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }
}
