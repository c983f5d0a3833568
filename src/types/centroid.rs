use serde::{Deserialize, Serialize};

/// The centroid of one country's boundary geometry.
///
/// `iso_a3` is taken verbatim from the boundary attributes and may be absent.
/// Coordinates are NaN when the geometry had no centroid (null or empty shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryCentroid {
    pub iso_a3: Option<String>,
    pub lon: f64,
    pub lat: f64,
}

impl CountryCentroid {
    pub fn new(iso_a3: Option<String>, lon: f64, lat: f64) -> Self {
        Self { iso_a3, lon, lat }
    }
}
