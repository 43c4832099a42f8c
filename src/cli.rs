use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Result, bail};
use log::warn;

use crate::data::model::{GapminderDataset, Selection};

/// Dataset opened when no path is given on the command line.
pub const DEFAULT_DATA_FILE: &str = "gapminder_full.csv";

pub const HELP: &str = "\
Explore Gapminder country-year indicators by year and continent.

USAGE:
  gapminder-dashboard [OPTIONS] [DATA_FILE]

ARGS:
  DATA_FILE              .csv, .json or .parquet dataset [default: gapminder_full.csv]

OPTIONS:
  --year YEAR            Initial year (default: 2007 if present, else the latest)
  --continent NAME       Initial continent, repeat for several (default: all)
  --export PATH          Write the chart specs as Vega-Lite JSON and exit
  -h, --help             Print this help
";

/// Startup options.
#[derive(Debug, Clone, PartialEq)]
pub struct Flags {
    pub data_path: PathBuf,
    pub year: Option<i64>,
    pub continents: Vec<String>,
    pub export: Option<PathBuf>,
    pub help: bool,
}

impl Flags {
    pub fn from_env() -> Result<Self> {
        Self::from_vec(std::env::args_os().skip(1).collect())
    }

    pub fn from_vec(args: Vec<OsString>) -> Result<Self> {
        let mut args = pico_args::Arguments::from_vec(args);
        let help = args.contains(["-h", "--help"]);
        let year = args.opt_value_from_str("--year")?;
        let continents = args.values_from_str("--continent")?;
        let export = args.opt_value_from_str("--export")?;

        let rest = args.finish();
        let data_path = match rest.as_slice() {
            [] => PathBuf::from(DEFAULT_DATA_FILE),
            [path] => PathBuf::from(path),
            _ => bail!("unexpected arguments: {rest:?}"),
        };

        Ok(Flags {
            data_path,
            year,
            continents,
            export,
            help,
        })
    }

    /// The starting selection for `dataset`. Requested values that the
    /// dataset does not contain are kept, so they show up as an empty result.
    pub fn selection_for(&self, dataset: &GapminderDataset) -> Selection {
        let mut selection = Selection::default_for(dataset);

        if let Some(year) = self.year {
            if !dataset.years.contains(&year) {
                warn!("Year {year} is not in the dataset");
            }
            selection.year = year;
        }

        if !self.continents.is_empty() {
            for name in &self.continents {
                if !dataset.continents.contains(name) {
                    warn!("Continent {name:?} is not in the dataset");
                }
            }
            selection.continents = self.continents.iter().cloned().collect();
        }

        selection
    }
}
