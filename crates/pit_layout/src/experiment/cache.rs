//! Cache for parsed treasure datasets.
//!
//! This module provides a cache that maps dataset paths to parsed polygons and artefact point
//! clouds, so an experiment reads each file once no matter how many trials it runs.
//!
//! Typical usage:
//! - Look up a dataset with [`DatasetCache::polygon`] or [`DatasetCache::point_cloud`].
//! - Reuse one cache across experiments that share datasets.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::Polygon;
use crate::treasure::{read_shapefile_polygon, ArtefactCloud};

/// Parsed datasets keyed by path. Polygons are also keyed by orientation.
#[derive(Default)]
pub struct DatasetCache {
    polygons: HashMap<(PathBuf, bool), Arc<Polygon>>,
    clouds: HashMap<PathBuf, Arc<ArtefactCloud>>,
}

impl DatasetCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the polygon at `path`, reading and normalising it on first use.
    pub fn polygon(&mut self, path: impl AsRef<Path>, rotate: bool) -> Result<Arc<Polygon>> {
        let key = (path.as_ref().to_path_buf(), rotate);
        if !self.polygons.contains_key(&key) {
            debug!(path = %key.0.display(), rotate, "reading polygon");
            let polygon = read_shapefile_polygon(&key.0, rotate)?;
            self.polygons.insert(key.clone(), Arc::new(polygon));
        }
        match self.polygons.get(&key) {
            Some(p) => Ok(p.clone()),
            None => Err(Error::Other("polygon missing after insert".to_string())),
        }
    }

    /// Gets the artefact cloud at `path`, reading it on first use.
    pub fn point_cloud(&mut self, path: impl AsRef<Path>) -> Result<Arc<ArtefactCloud>> {
        let key = path.as_ref().to_path_buf();
        if !self.clouds.contains_key(&key) {
            debug!(path = %key.display(), "reading artefact cloud");
            let cloud = ArtefactCloud::from_csv_path(&key)?;
            self.clouds.insert(key.clone(), Arc::new(cloud));
        }
        match self.clouds.get(&key) {
            Some(c) => Ok(c.clone()),
            None => Err(Error::Other("point cloud missing after insert".to_string())),
        }
    }

    /// Registers an already parsed polygon under `path`.
    pub fn insert_polygon(&mut self, path: impl Into<PathBuf>, rotate: bool, polygon: Polygon) {
        self.polygons
            .insert((path.into(), rotate), Arc::new(polygon));
    }

    /// Registers an already parsed artefact cloud under `path`.
    pub fn insert_point_cloud(&mut self, path: impl Into<PathBuf>, cloud: ArtefactCloud) {
        self.clouds.insert(path.into(), Arc::new(cloud));
    }

    /// Number of cached datasets.
    pub fn len(&self) -> usize {
        self.polygons.len() + self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all entries from the cache.
    pub fn clear(&mut self) {
        self.polygons.clear();
        self.clouds.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::treasure::polygon::tests::encode_shapefile;

    #[test]
    fn reads_each_point_cloud_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,xcoord,ycoord").unwrap();
        writeln!(file, "1,10.0,20.0").unwrap();
        writeln!(file, "2,12.5,21.0").unwrap();
        file.flush().unwrap();

        let mut cache = DatasetCache::new();
        let a = cache.point_cloud(file.path()).unwrap();
        assert_eq!(a.len(), 2);

        // A second lookup must not touch the file.
        std::fs::write(file.path(), "garbage").unwrap();
        let b = cache.point_cloud(file.path()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn polygons_are_keyed_by_orientation() {
        let bytes = encode_shapefile(&[vec![
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 1.0],
            [0.0, 1.0],
            [0.0, 0.0],
        ]]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();

        let mut cache = DatasetCache::new();
        let upright = cache.polygon(file.path(), false).unwrap();
        let turned = cache.polygon(file.path(), true).unwrap();
        assert_eq!(upright.bounds().width(), 4.0);
        assert_eq!(turned.bounds().width(), 1.0);
        assert_eq!(cache.len(), 2);
        assert!(Arc::ptr_eq(&upright, &cache.polygon(file.path(), false).unwrap()));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_file_is_an_error_and_not_cached() {
        let mut cache = DatasetCache::new();
        assert!(cache.point_cloud("/nonexistent/artefacts.csv").is_err());
        assert!(cache.is_empty());
    }
}
