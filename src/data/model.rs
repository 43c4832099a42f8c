use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Year the dashboard opens on when the dataset contains it.
pub const PREFERRED_YEAR: i64 = 2007;

// ---------------------------------------------------------------------------
// Observation – one row of the dataset
// ---------------------------------------------------------------------------

/// One country-year row. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub country: String,
    pub continent: String,
    pub year: i64,
    pub population: f64,
    pub gdp_cap: f64,
    pub life_exp: f64,
}

// ---------------------------------------------------------------------------
// GapminderDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with the distinct values the widgets offer.
#[derive(Debug, Clone, PartialEq)]
pub struct GapminderDataset {
    /// All observations, in file order.
    pub observations: Vec<Observation>,
    /// Sorted distinct years.
    pub years: Vec<i64>,
    /// Sorted distinct continents.
    pub continents: BTreeSet<String>,
}

impl GapminderDataset {
    /// Build the year and continent indices from the loaded rows.
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let years: BTreeSet<i64> = observations.iter().map(|o| o.year).collect();
        let continents: BTreeSet<String> =
            observations.iter().map(|o| o.continent.clone()).collect();

        GapminderDataset {
            observations,
            years: years.into_iter().collect(),
            continents,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// 2007 when present, otherwise the latest year.
    pub fn default_year(&self) -> Option<i64> {
        if self.years.contains(&PREFERRED_YEAR) {
            Some(PREFERRED_YEAR)
        } else {
            self.years.last().copied()
        }
    }
}

// ---------------------------------------------------------------------------
// Selection – the user's current filter choice
// ---------------------------------------------------------------------------

/// The active (year, continents) filter. An empty continent set means
/// "all continents".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub year: i64,
    pub continents: BTreeSet<String>,
}

impl Selection {
    /// Default year with every continent selected.
    pub fn default_for(dataset: &GapminderDataset) -> Self {
        Selection {
            year: dataset.default_year().unwrap_or(PREFERRED_YEAR),
            continents: dataset.continents.clone(),
        }
    }

    /// Whether rows of `continent` pass the continent filter.
    pub fn includes_continent(&self, continent: &str) -> bool {
        self.continents.is_empty() || self.continents.contains(continent)
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Per-continent summary statistics for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub continent: String,
    pub total_population: f64,
    pub avg_gdp_per_capita: f64,
    pub avg_life_expectancy: f64,
}

impl AggregateRow {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::AvgGdpPerCapita => self.avg_gdp_per_capita,
            Metric::TotalPopulation => self.total_population,
            Metric::AvgLifeExpectancy => self.avg_life_expectancy,
        }
    }
}

/// The aggregated metrics, declared in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AvgGdpPerCapita,
    TotalPopulation,
    AvgLifeExpectancy,
}

impl Metric {
    pub const ORDER: [Metric; 3] = [
        Metric::AvgGdpPerCapita,
        Metric::TotalPopulation,
        Metric::AvgLifeExpectancy,
    ];

    /// Column name used in the long-form table and exported specs.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::AvgGdpPerCapita => "avg_gdp_per_capita",
            Metric::TotalPopulation => "total_population",
            Metric::AvgLifeExpectancy => "avg_life_expectancy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::AvgGdpPerCapita => "Avg. GDP per capita",
            Metric::TotalPopulation => "Total population",
            Metric::AvgLifeExpectancy => "Avg. life expectancy",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// One (continent, metric, value) triple of the melted aggregate table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub continent: String,
    #[serde(rename = "Metric")]
    pub metric: Metric,
    #[serde(rename = "Value")]
    pub value: f64,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn obs(
        country: &str,
        continent: &str,
        year: i64,
        population: f64,
        gdp_cap: f64,
        life_exp: f64,
    ) -> Observation {
        Observation {
            country: country.to_string(),
            continent: continent.to_string(),
            year,
            population,
            gdp_cap,
            life_exp,
        }
    }

    /// Small fixture spanning two years and four continents.
    pub(crate) fn sample_dataset() -> GapminderDataset {
        GapminderDataset::from_observations(vec![
            obs("Japan", "Asia", 2002, 127.0e6, 28_604.6, 82.0),
            obs("Japan", "Asia", 2007, 127.5e6, 31_656.1, 82.6),
            obs("India", "Asia", 2002, 1_034.2e6, 1_746.8, 62.9),
            obs("India", "Asia", 2007, 1_110.4e6, 2_452.2, 64.7),
            obs("France", "Europe", 2002, 59.9e6, 28_926.0, 79.6),
            obs("France", "Europe", 2007, 61.1e6, 30_470.0, 80.7),
            obs("Norway", "Europe", 2007, 4.6e6, 49_357.2, 80.2),
            obs("Kenya", "Africa", 2007, 35.6e6, 1_463.2, 54.1),
            obs("Chile", "Americas", 2002, 15.5e6, 10_778.8, 77.9),
        ])
    }

    #[test]
    fn distinct_years_and_continents_are_sorted() {
        let ds = sample_dataset();
        assert_eq!(ds.years, vec![2002, 2007]);
        let continents: Vec<&str> = ds.continents.iter().map(String::as_str).collect();
        assert_eq!(continents, ["Africa", "Americas", "Asia", "Europe"]);
        assert_eq!(ds.len(), 9);
    }

    #[test]
    fn default_year_prefers_2007() {
        assert_eq!(sample_dataset().default_year(), Some(2007));
    }

    #[test]
    fn default_year_falls_back_to_latest() {
        let ds = GapminderDataset::from_observations(vec![
            obs("Chile", "Americas", 1952, 6.4e6, 3_939.9, 54.7),
            obs("Chile", "Americas", 1997, 14.6e6, 10_118.1, 75.8),
        ]);
        assert_eq!(ds.default_year(), Some(1997));
        assert_eq!(GapminderDataset::from_observations(Vec::new()).default_year(), None);
    }

    #[test]
    fn default_selection_covers_all_continents() {
        let ds = sample_dataset();
        let sel = Selection::default_for(&ds);
        assert_eq!(sel.year, 2007);
        assert_eq!(sel.continents, ds.continents);
    }

    #[test]
    fn empty_continent_set_includes_everything() {
        let sel = Selection { year: 2007, continents: BTreeSet::new() };
        assert!(sel.includes_continent("Oceania"));
    }

    #[test]
    fn metric_order_is_fixed() {
        let names: Vec<&str> = Metric::ORDER.iter().map(|m| m.column_name()).collect();
        assert_eq!(names, ["avg_gdp_per_capita", "total_population", "avg_life_expectancy"]);
        assert!(Metric::AvgGdpPerCapita < Metric::TotalPopulation);
        assert!(Metric::TotalPopulation < Metric::AvgLifeExpectancy);
    }
}
