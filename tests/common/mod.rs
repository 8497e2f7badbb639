use std::cell::RefCell;
use std::collections::HashMap;

use geo::{polygon, Geometry, MultiPolygon};
use mapfiles::{BoundaryLookup, GeoLevel, ProcessingError};

/// In-memory boundary service: returns canned geometries and counts how
/// many lookups the importer actually performed.
pub struct FakeBoundaries {
    shapes: HashMap<(GeoLevel, String), Geometry<f64>>,
    calls: RefCell<usize>,
}

impl FakeBoundaries {
    pub fn new() -> Self {
        Self { shapes: HashMap::new(), calls: RefCell::new(0) }
    }

    pub fn with(mut self, level: GeoLevel, geo_id: &str, geometry: Geometry<f64>) -> Self {
        self.shapes.insert((level, geo_id.to_string()), geometry);
        self
    }

    pub fn call_count(&self) -> usize {
        *self.calls.borrow()
    }
}

impl BoundaryLookup for FakeBoundaries {
    fn fetch(
        &self,
        level: GeoLevel,
        geo_id: &str,
    ) -> Result<Option<Geometry<f64>>, ProcessingError> {
        *self.calls.borrow_mut() += 1;
        Ok(self.shapes.get(&(level, geo_id.to_string())).cloned())
    }
}

/// Unit square multipolygon with its corner at (x, y).
pub fn square_at(x: f64, y: f64) -> Geometry<f64> {
    let square = polygon![
        (x: x, y: y),
        (x: x + 2.0, y: y),
        (x: x + 2.0, y: y + 2.0),
        (x: x, y: y + 2.0),
    ];
    Geometry::MultiPolygon(MultiPolygon(vec![square]))
}
