use crate::catalog::Catalog;
use crate::error::EstimateError;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// File modification-time probe, injectable so cache tests do not have to
/// sleep between writes.
pub trait ModTimeSource {
    fn modified(&self, path: &Path) -> Option<SystemTime>;
}

pub struct FsModTime;

impl ModTimeSource for FsModTime {
    fn modified(&self, path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}

/// Caches a catalog file keyed by its modification time. `get` re-reads only
/// when the file changed; `reload` always re-reads.
pub struct CatalogService {
    path: PathBuf,
    mod_time: Box<dyn ModTimeSource>,
    cached: Option<(Option<SystemTime>, Catalog)>,
}

impl CatalogService {
    pub fn new(path: PathBuf) -> CatalogService {
        CatalogService::with_mod_time(path, Box::new(FsModTime))
    }

    pub fn with_mod_time(path: PathBuf, mod_time: Box<dyn ModTimeSource>) -> CatalogService {
        CatalogService {
            path,
            mod_time,
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&mut self) -> Result<&Catalog, EstimateError> {
        let stamp = self.mod_time.modified(&self.path);
        let stale = match &self.cached {
            Some((cached_stamp, _)) => *cached_stamp != stamp,
            None => true,
        };
        if stale {
            let catalog = Catalog::load(&self.path)?;
            tracing::info!(path = %self.path.display(), version = catalog.version(), "catalog loaded");
            self.cached = Some((stamp, catalog));
        }
        match &self.cached {
            Some((_, catalog)) => Ok(catalog),
            None => Err(EstimateError::Compute("catalog cache empty".into())),
        }
    }

    pub fn reload(&mut self) -> Result<&Catalog, EstimateError> {
        self.cached = None;
        self.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Clone)]
    struct FakeModTime(Rc<Cell<u64>>);

    impl ModTimeSource for FakeModTime {
        fn modified(&self, _path: &Path) -> Option<SystemTime> {
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(self.0.get()))
        }
    }

    fn minimal_catalog(version: &str) -> String {
        format!(
            r#"{{
            "version": "{version}",
            "overhead_rate_default": "0.10",
            "target_gm_default": "0.35",
            "labor_rates": {{
                "Lap": {{"Metro": "3.35", "NorthCo": "3.50", "Mountains": "3.75"}},
                "BoardAndBatten": {{"Metro": "3.10", "NorthCo": "3.35", "Mountains": "3.50"}},
                "Shake": {{"Metro": "4.00", "NorthCo": "4.00", "Mountains": "4.00"}}
            }},
            "items": {{"wrap_roll": {{"name": "Wrap", "uom": "RL", "cost": {{"Metro": "165.50"}}}}}},
            "assemblies": {{}}
        }}"#
        )
    }

    #[test]
    fn test_cache_hits_until_mtime_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, minimal_catalog("v1")).unwrap();

        let clock = Rc::new(Cell::new(100));
        let mut svc =
            CatalogService::with_mod_time(path.clone(), Box::new(FakeModTime(clock.clone())));
        assert_eq!(svc.get().unwrap().version(), "v1");

        // File content changes but the stamp does not: cache still serves v1.
        std::fs::write(&path, minimal_catalog("v2")).unwrap();
        assert_eq!(svc.get().unwrap().version(), "v1");

        clock.set(101);
        assert_eq!(svc.get().unwrap().version(), "v2");
    }

    #[test]
    fn test_reload_bypasses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, minimal_catalog("v1")).unwrap();

        let clock = Rc::new(Cell::new(100));
        let mut svc =
            CatalogService::with_mod_time(path.clone(), Box::new(FakeModTime(clock)));
        assert_eq!(svc.get().unwrap().version(), "v1");

        let mut f = std::fs::OpenOptions::new().write(true).truncate(true).open(&path).unwrap();
        f.write_all(minimal_catalog("v2").as_bytes()).unwrap();
        drop(f);
        assert_eq!(svc.reload().unwrap().version(), "v2");
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let mut svc = CatalogService::new(PathBuf::from("/nonexistent/catalog.json"));
        assert!(matches!(
            svc.get().unwrap_err(),
            EstimateError::CatalogLoad { .. }
        ));
    }
}
