use geo::Geometry;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::BoundaryServiceConfig;
use crate::error::ProcessingError;
use crate::geom::geometry_from_geojson;
use crate::types::GeoLevel;

/// Boundary geometry source keyed by (geography level, geo-id).
///
/// `Ok(None)` means the service has no boundary for that key; transport
/// failures are errors. Tests supply an in-memory implementation.
pub trait BoundaryLookup {
    fn fetch(&self, level: GeoLevel, geo_id: &str) -> Result<Option<Geometry<f64>>, ProcessingError>;
}

/// Client for the census boundary API:
/// `GET {base}/geo/1.0/boundary-set/{level}/{geo-id}` returns a JSON body
/// whose `simple_shape` field holds a GeoJSON geometry.
pub struct HttpBoundaryClient {
    client: Client,
    base_url: String,
}

impl HttpBoundaryClient {
    pub fn new(config: &BoundaryServiceConfig) -> Result<Self, ProcessingError> {
        let client = Client::builder()
            .user_agent(concat!("mapfiles/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|err| ProcessingError::Lookup(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl BoundaryLookup for HttpBoundaryClient {
    fn fetch(&self, level: GeoLevel, geo_id: &str) -> Result<Option<Geometry<f64>>, ProcessingError> {
        let url = format!(
            "{}/geo/1.0/boundary-set/{}/{}",
            self.base_url,
            level.as_code(),
            geo_id
        );

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| ProcessingError::Lookup(format!("GET {url}: {err}")))?;

        if !response.status().is_success() {
            debug!(%url, status = %response.status(), "no boundary available");
            return Ok(None);
        }

        let payload: Value = response
            .json()
            .map_err(|err| ProcessingError::Lookup(format!("GET {url}: {err}")))?;
        let shape = payload.get("simple_shape").ok_or_else(|| {
            ProcessingError::BadGeometry(format!("boundary payload for {geo_id} has no simple_shape"))
        })?;

        Ok(Some(geometry_from_geojson(shape)?))
    }
}
