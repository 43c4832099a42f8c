//! Renderable chart specifications derived from the pipeline views.
//!
//! The egui plots in [`crate::ui::plot`] draw from these structs, and
//! [`DashboardCharts::to_vega_lite`] exports the same content as Vega-Lite
//! specs with inline data.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

use crate::data::model::{GapminderDataset, Metric, MetricValue, Selection};
use crate::data::pipeline::DashboardViews;

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Fields shown when hovering a scatter point.
pub const SCATTER_TOOLTIP: [&str; 5] = ["country", "continent", "life_exp", "gdp_cap", "population"];

// ---------------------------------------------------------------------------
// Grouped bar: three metrics per continent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartSpec {
    pub title: String,
    /// Continents along the x axis, in aggregate order.
    pub categories: Vec<String>,
    /// Bars within each group, in presentation order.
    pub metrics: Vec<Metric>,
    pub values: Vec<MetricValue>,
}

impl BarChartSpec {
    /// Value of one bar, if that continent/metric pair exists.
    pub fn value(&self, continent: &str, metric: Metric) -> Option<f64> {
        self.values
            .iter()
            .find(|v| v.continent == continent && v.metric == metric)
            .map(|v| v.value)
    }
}

// ---------------------------------------------------------------------------
// Scatter: GDP per capita (log x) vs. life expectancy
// ---------------------------------------------------------------------------

/// One country in the selected year. Field order is the tooltip order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub country: String,
    pub continent: String,
    pub life_exp: f64,
    pub gdp_cap: f64,
    pub population: f64,
}

impl ScatterPoint {
    /// `(field, value)` pairs in [`SCATTER_TOOLTIP`] order.
    pub fn tooltip(&self) -> Vec<(&'static str, String)> {
        SCATTER_TOOLTIP
            .iter()
            .map(|&field| {
                let value = match field {
                    "country" => self.country.clone(),
                    "continent" => self.continent.clone(),
                    "life_exp" => format!("{:.3}", self.life_exp),
                    "gdp_cap" => format!("{:.2}", self.gdp_cap),
                    "population" => format!("{:.0}", self.population),
                    _ => String::new(),
                };
                (field, value)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChartSpec {
    pub title: String,
    pub log_x: bool,
    pub points: Vec<ScatterPoint>,
}

impl ScatterChartSpec {
    /// The point closest to `(log10(gdp_cap), life_exp)` within `continent`.
    pub fn nearest(&self, continent: &str, log_gdp: f64, life_exp: f64) -> Option<&ScatterPoint> {
        self.points
            .iter()
            .filter(|p| p.continent == continent && p.gdp_cap > 0.0)
            .min_by(|a, b| {
                let da = (a.gdp_cap.log10() - log_gdp).powi(2) + (a.life_exp - life_exp).powi(2);
                let db = (b.gdp_cap.log10() - log_gdp).powi(2) + (b.life_exp - life_exp).powi(2);
                da.total_cmp(&db)
            })
    }
}

// ---------------------------------------------------------------------------
// Line: population over the years
// ---------------------------------------------------------------------------

/// Population of one country over time, as `[year, population]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub country: String,
    pub continent: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChartSpec {
    pub title: String,
    /// One series per country, sorted by (continent, country).
    pub series: Vec<LineSeries>,
}

// ---------------------------------------------------------------------------
// All three together
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub year: i64,
    pub bar: BarChartSpec,
    pub scatter: ScatterChartSpec,
    pub line: LineChartSpec,
}

impl DashboardCharts {
    pub fn build(dataset: &GapminderDataset, selection: &Selection, views: &DashboardViews) -> Self {
        let year = selection.year;

        let bar = BarChartSpec {
            title: format!("Population, GDP per Capita, and Life Expectancy ({year})"),
            categories: views.aggregates.iter().map(|r| r.continent.clone()).collect(),
            metrics: Metric::ORDER.to_vec(),
            values: views.long_form.clone(),
        };

        let scatter = ScatterChartSpec {
            title: format!("GDP per Capita vs. Life Expectancy ({year})"),
            log_x: true,
            points: views
                .year_rows
                .iter()
                .map(|&i| {
                    let obs = &dataset.observations[i];
                    ScatterPoint {
                        country: obs.country.clone(),
                        continent: obs.continent.clone(),
                        life_exp: obs.life_exp,
                        gdp_cap: obs.gdp_cap,
                        population: obs.population,
                    }
                })
                .collect(),
        };

        let mut by_country: BTreeMap<(&str, &str), Vec<[f64; 2]>> = BTreeMap::new();
        for &i in &views.history {
            let obs = &dataset.observations[i];
            by_country
                .entry((obs.continent.as_str(), obs.country.as_str()))
                .or_default()
                .push([obs.year as f64, obs.population]);
        }
        let series = by_country
            .into_iter()
            .map(|((continent, country), mut points)| {
                points.sort_by(|a, b| a[0].total_cmp(&b[0]));
                LineSeries {
                    country: country.to_string(),
                    continent: continent.to_string(),
                    points,
                }
            })
            .collect();

        let line = LineChartSpec {
            title: "Population Trend Across All Years".to_string(),
            series,
        };

        DashboardCharts {
            year,
            bar,
            scatter,
            line,
        }
    }

    /// `{ "bar": …, "scatter": …, "line": … }`, each a standalone Vega-Lite spec.
    pub fn to_vega_lite(&self) -> JsonValue {
        let metric_names: Vec<String> = self.bar.metrics.iter().map(|m| m.to_string()).collect();
        let x_scale = if self.scatter.log_x { "log" } else { "linear" };

        let bar = json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": self.bar.title,
            "data": { "values": self.bar.values },
            "mark": "bar",
            "encoding": {
                "x": {
                    "field": "continent",
                    "type": "nominal",
                    "title": "Continent",
                    "sort": self.bar.categories,
                },
                "xOffset": { "field": "Metric", "sort": metric_names },
                "y": { "field": "Value", "type": "quantitative", "title": "Value" },
                "color": { "field": "Metric", "type": "nominal", "sort": metric_names },
            },
        });

        let scatter = json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": self.scatter.title,
            "data": { "values": self.scatter.points },
            "mark": { "type": "circle", "size": 120, "opacity": 0.7 },
            "params": [{ "name": "zoom", "select": "interval", "bind": "scales" }],
            "encoding": {
                "x": {
                    "field": "gdp_cap",
                    "type": "quantitative",
                    "title": "GDP per Capita",
                    "scale": { "type": x_scale },
                },
                "y": { "field": "life_exp", "type": "quantitative", "title": "Life Expectancy" },
                "color": { "field": "continent", "type": "nominal", "title": "Continent" },
                "tooltip": SCATTER_TOOLTIP,
            },
        });

        let line_rows: Vec<JsonValue> = self
            .line
            .series
            .iter()
            .flat_map(|s| {
                s.points.iter().map(move |[year, population]| {
                    json!({
                        "country": s.country,
                        "continent": s.continent,
                        "year": *year as i64,
                        "population": population,
                    })
                })
            })
            .collect();
        let line = json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": self.line.title,
            "data": { "values": line_rows },
            "mark": "line",
            "encoding": {
                "x": { "field": "year", "type": "quantitative", "title": "Year" },
                "y": { "field": "population", "type": "quantitative", "title": "Population" },
                "color": { "field": "continent", "type": "nominal", "title": "Continent" },
                "detail": { "field": "country", "type": "nominal" },
            },
        });

        json!({ "bar": bar, "scatter": scatter, "line": line })
    }

    /// Write [`Self::to_vega_lite`] as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &self.to_vega_lite())
            .context("writing chart specs")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;
    use crate::data::pipeline;

    fn charts_for(continents: &[&str]) -> DashboardCharts {
        let ds = sample_dataset();
        let sel = Selection {
            year: 2007,
            continents: continents.iter().map(|c| c.to_string()).collect(),
        };
        let views = pipeline::run(&ds, &sel).views().cloned().unwrap();
        DashboardCharts::build(&ds, &sel, &views)
    }

    #[test]
    fn bar_chart_groups_three_metrics_per_continent() {
        let charts = charts_for(&["Asia", "Europe"]);
        assert_eq!(charts.bar.categories, ["Asia", "Europe"]);
        assert_eq!(charts.bar.metrics, Metric::ORDER);
        assert_eq!(charts.bar.values.len(), 6);
        assert_eq!(
            charts.bar.value("Europe", Metric::TotalPopulation),
            Some(61.1e6 + 4.6e6)
        );
        assert!(charts.bar.title.ends_with("(2007)"));
    }

    #[test]
    fn scatter_has_one_point_per_country_in_year() {
        let charts = charts_for(&[]);
        assert_eq!(charts.scatter.points.len(), 5);
        assert!(charts.scatter.log_x);

        let japan = charts
            .scatter
            .nearest("Asia", 31_656.1_f64.log10(), 82.5)
            .unwrap();
        assert_eq!(japan.country, "Japan");
        assert!(charts.scatter.nearest("Oceania", 3.0, 70.0).is_none());
    }

    #[test]
    fn tooltip_follows_exported_field_order() {
        let charts = charts_for(&["Africa"]);
        let tooltip = charts.scatter.points[0].tooltip();
        let fields: Vec<&str> = tooltip.iter().map(|(f, _)| *f).collect();
        assert_eq!(fields, SCATTER_TOOLTIP);
        assert_eq!(tooltip[0].1, "Kenya");
        assert_eq!(tooltip[4].1, "35600000");
    }

    #[test]
    fn line_series_cover_all_years_per_country() {
        let charts = charts_for(&["Asia"]);
        let series: Vec<(&str, usize)> = charts
            .line
            .series
            .iter()
            .map(|s| (s.country.as_str(), s.points.len()))
            .collect();
        assert_eq!(series, [("India", 2), ("Japan", 2)]);
        assert_eq!(charts.line.series[1].points[0], [2002.0, 127.0e6]);
    }

    #[test]
    fn vega_lite_export_carries_encodings() {
        let spec = charts_for(&["Asia", "Europe"]).to_vega_lite();

        assert_eq!(spec["bar"]["data"]["values"].as_array().unwrap().len(), 6);
        assert_eq!(spec["bar"]["data"]["values"][0]["Metric"], "avg_gdp_per_capita");
        assert_eq!(spec["scatter"]["encoding"]["x"]["scale"]["type"], "log");
        assert_eq!(
            spec["scatter"]["encoding"]["tooltip"],
            json!(["country", "continent", "life_exp", "gdp_cap", "population"])
        );
        assert_eq!(spec["line"]["data"]["values"].as_array().unwrap().len(), 7);
        assert_eq!(spec["line"]["encoding"]["color"]["field"], "continent");
    }

    #[test]
    fn write_json_produces_three_specs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts.json");
        let charts = charts_for(&["Africa"]);
        charts.write_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: JsonValue = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["bar"]["title"], charts.bar.title.as_str());
        assert_eq!(parsed["scatter"]["data"]["values"][0]["country"], "Kenya");
        assert_eq!(parsed["line"]["$schema"], VEGA_LITE_SCHEMA);
    }
}
