use super::model::{GapminderDataset, Selection};

// ---------------------------------------------------------------------------
// Row filters: both return indices into `dataset.observations`
// ---------------------------------------------------------------------------

/// Indices of observations whose continent passes the selection, across all
/// years. An empty continent set selects every row.
pub fn continent_indices(dataset: &GapminderDataset, selection: &Selection) -> Vec<usize> {
    dataset
        .observations
        .iter()
        .enumerate()
        .filter(|(_, obs)| selection.includes_continent(&obs.continent))
        .map(|(i, _)| i)
        .collect()
}

/// Narrow `indices` down to the observations recorded in `year`.
pub fn year_indices(dataset: &GapminderDataset, indices: &[usize], year: i64) -> Vec<usize> {
    indices
        .iter()
        .copied()
        .filter(|&i| dataset.observations[i].year == year)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::model::tests::sample_dataset;

    fn select(year: i64, continents: &[&str]) -> Selection {
        Selection {
            year,
            continents: continents.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn continent_filter_keeps_dataset_order() {
        let ds = sample_dataset();
        let idx = continent_indices(&ds, &select(2007, &["Europe"]));
        assert_eq!(idx, vec![4, 5, 6]);
    }

    #[test]
    fn empty_continent_set_matches_all_continents() {
        let ds = sample_dataset();
        let none = continent_indices(&ds, &select(2007, &[]));
        let all = continent_indices(
            &ds,
            &Selection {
                year: 2007,
                continents: ds.continents.clone(),
            },
        );
        assert_eq!(none, all);
        assert_eq!(none.len(), ds.len());
    }

    #[test]
    fn unknown_continent_matches_nothing() {
        let ds = sample_dataset();
        assert!(continent_indices(&ds, &select(2007, &["Antarctica"])).is_empty());
    }

    #[test]
    fn year_filter_applies_on_top_of_continent_filter() {
        let ds = sample_dataset();
        let filtered = continent_indices(&ds, &select(2002, &["Asia", "Americas"]));
        let rows = year_indices(&ds, &filtered, 2002);
        let countries: BTreeSet<&str> = rows
            .iter()
            .map(|&i| ds.observations[i].country.as_str())
            .collect();
        assert_eq!(countries, BTreeSet::from(["Chile", "India", "Japan"]));
    }
}
