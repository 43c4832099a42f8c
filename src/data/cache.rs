use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use anyhow::Result;
use log::{debug, info};

use super::loader::load_file;
use super::model::GapminderDataset;

type Cache = Mutex<HashMap<PathBuf, Arc<GapminderDataset>>>;

/// Process-wide datasets, keyed by the path they were loaded from.
fn cache() -> &'static Cache {
    static INSTANCE: OnceLock<Cache> = OnceLock::new();
    INSTANCE.get_or_init(Default::default)
}

/// Load `path` once per process and share the parsed dataset afterwards.
/// Failed loads are not remembered, so a later call retries.
pub fn load_cached(path: &Path) -> Result<Arc<GapminderDataset>> {
    let mut entries = cache().lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(dataset) = entries.get(path) {
        debug!("Reusing cached dataset for {}", path.display());
        return Ok(Arc::clone(dataset));
    }

    let dataset = Arc::new(load_file(path)?);
    info!(
        "Loaded {} observations from {} ({} years, continents {:?})",
        dataset.len(),
        path.display(),
        dataset.years.len(),
        dataset.continents
    );
    entries.insert(path.to_path_buf(), Arc::clone(&dataset));
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "country,continent,year,population,gdp_cap,life_exp\n";

    #[test]
    fn second_load_reuses_first_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cached.csv");
        std::fs::write(&path, format!("{HEADER}Chad,Africa,2007,10238807,1704.06,50.651\n")).unwrap();

        let first = load_cached(&path).unwrap();
        // The file changing on disk does not matter once it is cached.
        std::fs::write(&path, HEADER).unwrap();
        let second = load_cached(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn failed_load_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later.csv");

        assert!(load_cached(&path).is_err());
        std::fs::write(&path, format!("{HEADER}Peru,Americas,2007,28674757,7408.91,71.421\n")).unwrap();
        assert_eq!(load_cached(&path).unwrap().len(), 1);
    }
}
