use std::collections::BTreeMap;

use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use crate::charts::{BarChartSpec, LineChartSpec, ScatterChartSpec};
use crate::color::{ColorMap, metric_color};
use crate::data::pipeline::DashboardViews;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;

/// Horizontal room each continent gets in the grouped bar chart.
const GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the three charts, or the empty-result warning.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore the data  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Gapminder Dashboard");
            ui.label(
                "Scroll to explore continent metrics, GDP vs. life expectancy, and long-run \
                 population trends. Use the controls on the left to adjust the view.",
            );
            ui.add_space(8.0);

            if state.output.is_empty() {
                ui.colored_label(
                    Color32::from_rgb(230, 160, 0),
                    "⚠ No observations found for the chosen filters.",
                );
                return;
            }
            let (Some(views), Some(charts)) = (state.output.views(), &state.charts) else {
                return;
            };
            let year = state.selection.year;

            ui.heading(format!("Continent-wise Metrics ({year})"));
            bar_chart(ui, &charts.bar);
            ui.push_id("aggregate_table", |ui: &mut Ui| aggregate_table(ui, views));
            ui.add_space(12.0);

            ui.heading(format!("GDP per Capita vs. Life Expectancy ({year})"));
            scatter_chart(ui, &charts.scatter, &state.color_map);
            ui.add_space(12.0);

            ui.heading("Population Trend by Continent");
            line_chart(ui, &charts.line, &state.color_map);
        });
}

// ---------------------------------------------------------------------------
// Grouped bar chart
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, spec: &BarChartSpec) {
    ui.label(RichText::new(&spec.title).strong());

    let bar_width = GROUP_WIDTH / spec.metrics.len().max(1) as f64;
    let categories = spec.categories.clone();

    Plot::new("metrics_bar")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Continent")
        .y_axis_label("Value")
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&categories, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (m, &metric) in spec.metrics.iter().enumerate() {
                let offset = (m as f64 + 0.5) * bar_width - GROUP_WIDTH / 2.0;
                let bars: Vec<Bar> = spec
                    .categories
                    .iter()
                    .enumerate()
                    .filter_map(|(c, continent)| {
                        let value = spec.value(continent, metric)?;
                        Some(
                            Bar::new(c as f64 + offset, value)
                                .width(bar_width * 0.95)
                                .name(continent),
                        )
                    })
                    .collect();

                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(metric.label())
                        .color(metric_color(metric)),
                );
            }
        });
}

/// Axis label for a category slot; blank between slots.
fn category_label(categories: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

fn aggregate_table(ui: &mut Ui, views: &DashboardViews) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(110.0))
        .columns(Column::auto().at_least(140.0), 3)
        .header(20.0, |mut header| {
            for title in ["Continent", "Total population", "Avg. GDP per capita", "Avg. life expectancy"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in &views.aggregates {
                body.row(18.0, |mut cells| {
                    cells.col(|ui| {
                        ui.label(&row.continent);
                    });
                    cells.col(|ui| {
                        ui.label(format_population(row.total_population));
                    });
                    cells.col(|ui| {
                        ui.label(format!("{:.2}", row.avg_gdp_per_capita));
                    });
                    cells.col(|ui| {
                        ui.label(format!("{:.2}", row.avg_life_expectancy));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter: log10(GDP per capita) vs. life expectancy
// ---------------------------------------------------------------------------

fn scatter_chart(ui: &mut Ui, spec: &ScatterChartSpec, colors: &ColorMap) {
    let mut by_continent: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in spec.points.iter().filter(|p| p.gdp_cap > 0.0) {
        by_continent
            .entry(p.continent.as_str())
            .or_default()
            .push([p.gdp_cap.log10(), p.life_exp]);
    }

    let tooltip_spec = spec.clone();

    Plot::new("gdp_life_scatter")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("GDP per Capita (log scale)")
        .y_axis_label("Life Expectancy")
        .x_axis_formatter(|mark: GridMark, _range| format_gdp(10f64.powf(mark.value)))
        .label_formatter(move |name: &str, value: &PlotPoint| {
            tooltip_spec
                .nearest(name, value.x, value.y)
                .map(|p| {
                    p.tooltip()
                        .into_iter()
                        .map(|(field, value)| format!("{field}: {value}"))
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (continent, points) in by_continent {
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(continent)
                        .color(colors.color_for(continent).gamma_multiply(0.7))
                        .radius(5.0)
                        .filled(true),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Line: population per country over the years
// ---------------------------------------------------------------------------

fn line_chart(ui: &mut Ui, spec: &LineChartSpec, colors: &ColorMap) {
    ui.label(RichText::new(&spec.title).strong());

    Plot::new("population_trend")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Population")
        .y_axis_formatter(|mark: GridMark, _range| format_population(mark.value))
        .show(ui, |plot_ui| {
            // Series sharing a continent name share one legend entry.
            for series in &spec.series {
                plot_ui.line(
                    Line::new(PlotPoints::from(series.points.clone()))
                        .name(&series.continent)
                        .color(colors.color_for(&series.continent))
                        .width(1.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

fn format_population(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.2} B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1} M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1} k", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

fn format_gdp(value: f64) -> String {
    if value >= 1e3 {
        format!("{:.0}k", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_slots() {
        let cats = vec!["Africa".to_string(), "Asia".to_string()];
        assert_eq!(category_label(&cats, 1.0), "Asia");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, 2.0), "");
        assert_eq!(category_label(&cats, -1.0), "");
    }

    #[test]
    fn population_uses_short_units() {
        assert_eq!(format_population(1_318_683_096.0), "1.32 B");
        assert_eq!(format_population(4_627_926.0), "4.6 M");
        assert_eq!(format_population(512.0), "512");
    }

    #[test]
    fn gdp_ticks_in_thousands() {
        assert_eq!(format_gdp(10_000.0), "10k");
        assert_eq!(format_gdp(300.0), "300");
    }
}
