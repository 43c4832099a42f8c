use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{CastOptions, cast_with_options};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{GapminderDataset, Observation};

/// Columns every input file must provide, in any order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "country",
    "continent",
    "year",
    "population",
    "gdp_cap",
    "life_exp",
];

/// Shape problems in an input file, as opposed to I/O or parse failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("column '{0}' contains null values")]
    NullValues(&'static str),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a Gapminder dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "country": "...", "continent": "...", "year": 2007, ... }, ...]`
/// * `.parquet` – one column per field, numeric columns of any int/float type
pub fn load_file(path: &Path) -> Result<GapminderDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(SchemaError::UnsupportedExtension(other.to_string()).into()),
    }
}

/// Fail with the first required column absent from `columns`.
fn check_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<(), SchemaError> {
    let present: Vec<&str> = columns.into_iter().collect();
    match REQUIRED_COLUMNS.iter().copied().find(|c| !present.contains(c)) {
        Some(missing) => Err(SchemaError::MissingColumn(missing)),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Comma-separated, one observation per row. Extra columns are ignored.
fn load_csv(path: &Path) -> Result<GapminderDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    check_columns(headers.iter())?;

    let mut observations = Vec::new();
    for (row_no, result) in reader.deserialize::<Observation>().enumerate() {
        // line 1 is the header
        let obs = result.with_context(|| format!("CSV line {}", row_no + 2))?;
        observations.push(obs);
    }

    Ok(GapminderDataset::from_observations(observations))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<GapminderDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut observations = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        check_columns(obj.keys().map(String::as_str))?;

        let obs: Observation = serde_json::from_value(rec.clone())
            .with_context(|| format!("Row {i}: invalid observation"))?;
        observations.push(obs);
    }

    Ok(GapminderDataset::from_observations(observations))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); integer population or year columns
/// are cast as needed.
fn load_parquet(path: &Path) -> Result<GapminderDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut observations = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let country = column_as(&batch, "country", &DataType::Utf8)?;
        let continent = column_as(&batch, "continent", &DataType::Utf8)?;
        let year = column_as(&batch, "year", &DataType::Int64)?;
        let population = column_as(&batch, "population", &DataType::Float64)?;
        let gdp_cap = column_as(&batch, "gdp_cap", &DataType::Float64)?;
        let life_exp = column_as(&batch, "life_exp", &DataType::Float64)?;

        let country = country.as_string::<i32>();
        let continent = continent.as_string::<i32>();
        let year = year.as_primitive::<Int64Type>();
        let population = population.as_primitive::<Float64Type>();
        let gdp_cap = gdp_cap.as_primitive::<Float64Type>();
        let life_exp = life_exp.as_primitive::<Float64Type>();

        for row in 0..batch.num_rows() {
            observations.push(Observation {
                country: country.value(row).to_string(),
                continent: continent.value(row).to_string(),
                year: year.value(row),
                population: population.value(row),
                gdp_cap: gdp_cap.value(row),
                life_exp: life_exp.value(row),
            });
        }
    }

    Ok(GapminderDataset::from_observations(observations))
}

/// Look up a required column and cast it to `to`. Values the cast cannot
/// convert are an error, and so are nulls.
fn column_as(batch: &RecordBatch, name: &'static str, to: &DataType) -> Result<ArrayRef> {
    let col = batch
        .column_by_name(name)
        .ok_or(SchemaError::MissingColumn(name))?;
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    let cast = cast_with_options(col, to, &options)
        .with_context(|| format!("casting '{name}' to {to:?}"))?;
    if cast.null_count() > 0 {
        bail!(SchemaError::NullValues(name));
    }
    Ok(cast)
}
