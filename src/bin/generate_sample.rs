use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::print_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Same column layout as `gapminder_full.csv`.
#[derive(Serialize)]
struct Row {
    country: String,
    year: i64,
    population: i64,
    continent: String,
    life_exp: f64,
    gdp_cap: f64,
}

/// SplitMix64 stream; deterministic so the sample file is reproducible.
struct Jitter(u64);

impl Jitter {
    /// Uniform in [0, 1].
    fn unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        (z ^ (z >> 31)) as f64 / u64::MAX as f64
    }

    /// Roughly normal with the given mean and standard deviation (sum of four uniforms).
    fn around(&mut self, mean: f64, std_dev: f64) -> f64 {
        let sum: f64 = (0..4).map(|_| self.unit()).sum();
        mean + std_dev * (sum - 2.0) * 3f64.sqrt()
    }
}

fn main() {
    let mut rng = Jitter(42);

    // (country, continent, population 1952, gdp per capita 1952, life expectancy 1952)
    let countries = [
        ("Nigeria", "Africa", 33.1e6, 1_077.3, 36.3),
        ("Kenya", "Africa", 6.5e6, 853.5, 42.3),
        ("Egypt", "Africa", 22.2e6, 1_418.8, 41.9),
        ("Brazil", "Americas", 56.6e6, 2_108.9, 50.9),
        ("Canada", "Americas", 14.8e6, 11_367.2, 68.8),
        ("Chile", "Americas", 6.4e6, 3_939.9, 54.7),
        ("India", "Asia", 372.0e6, 546.6, 37.4),
        ("Japan", "Asia", 86.5e6, 3_216.9, 63.0),
        ("Indonesia", "Asia", 82.1e6, 749.7, 37.5),
        ("France", "Europe", 42.5e6, 7_029.8, 67.4),
        ("Norway", "Europe", 3.3e6, 10_095.4, 72.7),
        ("Poland", "Europe", 25.7e6, 4_029.3, 61.3),
        ("Australia", "Oceania", 8.7e6, 10_039.6, 69.1),
        ("New Zealand", "Oceania", 1.99e6, 10_556.6, 69.4),
    ];
    let years: Vec<i64> = (1952..=2007).step_by(5).collect();

    let mut rows = Vec::new();
    for &(country, continent, pop0, gdp0, life0) in &countries {
        let pop_growth = rng.around(0.018, 0.006);
        let gdp_growth = rng.around(0.022, 0.01);
        let life_gain = rng.around(0.33, 0.08);

        for &year in &years {
            let t = (year - 1952) as f64;
            let population = pop0 * (pop_growth * t).exp();
            let gdp_cap = gdp0 * (gdp_growth * t).exp() * (1.0 + rng.around(0.0, 0.03));
            let life_exp = (life0 + life_gain * t + rng.around(0.0, 0.4)).min(85.0);

            rows.push(Row {
                country: country.to_string(),
                year,
                population: population.round() as i64,
                continent: continent.to_string(),
                life_exp: (life_exp * 1000.0).round() / 1000.0,
                gdp_cap: gdp_cap.max(1.0),
            });
        }
    }

    // Write CSV
    let csv_path = "gapminder_sample.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    for row in &rows {
        writer.serialize(row).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // Build Arrow arrays
    let schema = Arc::new(Schema::new(vec![
        Field::new("country", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("population", DataType::Int64, false),
        Field::new("continent", DataType::Utf8, false),
        Field::new("life_exp", DataType::Float64, false),
        Field::new("gdp_cap", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.country.as_str()))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.population))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.continent.as_str()))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.life_exp))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.gdp_cap))),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let parquet_path = "gapminder_sample.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    print_batches(&[batch.slice(0, 5)]).expect("Failed to print preview");
    println!(
        "Wrote {} observations ({} countries × {} years) to {csv_path} and {parquet_path}",
        rows.len(),
        countries.len(),
        years.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_is_deterministic_and_bounded() {
        let mut a = Jitter(7);
        let mut b = Jitter(7);
        for _ in 0..1000 {
            let u = a.unit();
            assert_eq!(u, b.unit());
            assert!((0.0..=1.0).contains(&u));
        }
        let spread = a.around(10.0, 1.0);
        assert!((10.0 - 2.0 * 3f64.sqrt()..=10.0 + 2.0 * 3f64.sqrt()).contains(&spread));
    }
}
