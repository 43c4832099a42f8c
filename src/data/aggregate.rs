use std::collections::BTreeMap;

use super::model::{AggregateRow, GapminderDataset, Metric, MetricValue};

#[derive(Default)]
struct Accumulator {
    population: f64,
    gdp_cap: f64,
    life_exp: f64,
    count: usize,
}

/// Group the given rows by continent: sum of population, mean GDP per capita
/// and mean life expectancy. Groups come out sorted by continent name.
pub fn aggregate_by_continent(dataset: &GapminderDataset, indices: &[usize]) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for &i in indices {
        let obs = &dataset.observations[i];
        let acc = groups.entry(obs.continent.as_str()).or_default();
        acc.population += obs.population;
        acc.gdp_cap += obs.gdp_cap;
        acc.life_exp += obs.life_exp;
        acc.count += 1;
    }

    groups
        .into_iter()
        .map(|(continent, acc)| {
            // count >= 1 for every group that exists
            let n = acc.count as f64;
            AggregateRow {
                continent: continent.to_string(),
                total_population: acc.population,
                avg_gdp_per_capita: acc.gdp_cap / n,
                avg_life_expectancy: acc.life_exp / n,
            }
        })
        .collect()
}

/// Reshape aggregates into (continent, metric, value) rows, ordered by
/// continent and then by the fixed metric order.
pub fn melt(aggregates: &[AggregateRow]) -> Vec<MetricValue> {
    let mut long: Vec<MetricValue> = aggregates
        .iter()
        .flat_map(|row| {
            Metric::ORDER.into_iter().map(move |metric| MetricValue {
                continent: row.continent.clone(),
                metric,
                value: row.value(metric),
            })
        })
        .collect();
    long.sort_by(|a, b| a.continent.cmp(&b.continent).then(a.metric.cmp(&b.metric)));
    long
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn sums_population_and_averages_rates() {
        let ds = sample_dataset();
        let idx: Vec<usize> = (0..ds.len()).filter(|&i| ds.observations[i].year == 2007).collect();
        let rows = aggregate_by_continent(&ds, &idx);

        let asia = rows.iter().find(|r| r.continent == "Asia").unwrap();
        assert!(approx(asia.total_population, 127.5e6 + 1_110.4e6));
        assert!(approx(asia.avg_gdp_per_capita, (31_656.1 + 2_452.2) / 2.0));
        assert!(approx(asia.avg_life_expectancy, (82.6 + 64.7) / 2.0));

        let europe = rows.iter().find(|r| r.continent == "Europe").unwrap();
        assert!(approx(europe.total_population, 61.1e6 + 4.6e6));
    }

    #[test]
    fn groups_are_sorted_by_continent() {
        let ds = sample_dataset();
        let idx: Vec<usize> = (0..ds.len()).collect();
        let names: Vec<String> = aggregate_by_continent(&ds, &idx)
            .into_iter()
            .map(|r| r.continent)
            .collect();
        assert_eq!(names, ["Africa", "Americas", "Asia", "Europe"]);
    }

    #[test]
    fn no_rows_no_groups() {
        assert!(aggregate_by_continent(&sample_dataset(), &[]).is_empty());
    }

    #[test]
    fn melt_emits_three_metrics_per_continent_in_order() {
        let ds = sample_dataset();
        let idx: Vec<usize> = (0..ds.len()).filter(|&i| ds.observations[i].year == 2007).collect();
        let rows = aggregate_by_continent(&ds, &idx);
        let long = melt(&rows);

        assert_eq!(long.len(), rows.len() * 3);
        for (chunk, row) in long.chunks(3).zip(&rows) {
            let metrics: Vec<Metric> = chunk.iter().map(|m| m.metric).collect();
            assert_eq!(metrics, Metric::ORDER);
            assert!(chunk.iter().all(|m| m.continent == row.continent));
            assert_eq!(chunk[1].value, row.total_population);
        }
    }
}
