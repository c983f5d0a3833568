//! Country centroids from boundary geometries.

use crate::geometry::error::GeometryError;
use crate::types::centroid::CountryCentroid;
use geo::{Centroid, Geometry};
use log::{debug, info};
use polars::prelude::*;
use shapefile::dbase::FieldValue;
use std::path::Path;

/// Attribute holding the ISO 3166-1 alpha-3 code in Natural Earth admin-0 files.
pub const ISO_ATTRIBUTE: &str = "ISO_A3";

/// Reads every record of a boundary shapefile and returns its centroid.
///
/// One centroid is emitted per record, in file order. The `ISO_A3` attribute is kept
/// verbatim; records without it, or whose shape has no centroid, are still emitted.
pub fn load_country_centroids(path: &Path) -> Result<Vec<CountryCentroid>, GeometryError> {
    let mut reader = shapefile::Reader::from_path(path)
        .map_err(|e| GeometryError::ShapefileOpen(path.to_path_buf(), e))?;

    let mut records = Vec::new();
    for (index, item) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = item.map_err(|e| GeometryError::ShapefileRecord {
            path: path.to_path_buf(),
            index,
            source: e,
        })?;
        let iso = match record.get(ISO_ATTRIBUTE) {
            Some(FieldValue::Character(value)) => value.clone(),
            _ => None,
        };
        let geometry = Geometry::<f64>::try_from(shape).ok();
        if geometry.is_none() {
            debug!("Record {} ({:?}) has no usable geometry", index, iso);
        }
        records.push((iso, geometry));
    }

    let centroids = centroids_from_geometries(records);
    info!("Computed {} centroids from {}", centroids.len(), path.display());
    Ok(centroids)
}

/// Computes the centroid of each `(identifier, geometry)` pair.
///
/// Missing geometries and geometries without a centroid produce NaN coordinates.
pub fn centroids_from_geometries<I>(records: I) -> Vec<CountryCentroid>
where
    I: IntoIterator<Item = (Option<String>, Option<Geometry<f64>>)>,
{
    records
        .into_iter()
        .map(|(iso, geometry)| {
            let point = geometry.as_ref().and_then(|g| g.centroid());
            match point {
                Some(p) => CountryCentroid::new(iso, p.x(), p.y()),
                None => CountryCentroid::new(iso, f64::NAN, f64::NAN),
            }
        })
        .collect()
}

/// Renders centroids as a frame with columns `iso_a3, centroid_lon, centroid_lat`.
pub fn centroids_to_frame(centroids: &[CountryCentroid]) -> Result<DataFrame, GeometryError> {
    let iso: Vec<Option<&str>> = centroids.iter().map(|c| c.iso_a3.as_deref()).collect();
    let lon: Vec<f64> = centroids.iter().map(|c| c.lon).collect();
    let lat: Vec<f64> = centroids.iter().map(|c| c.lat).collect();
    Ok(df!(
        "iso_a3" => iso,
        "centroid_lon" => lon,
        "centroid_lat" => lat,
    )?)
}
