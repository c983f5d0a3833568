//! In-memory gridded climate fields and nearest-gridpoint lookup.

use crate::climate::error::ClimateError;
use chrono::NaiveDateTime;
use ndarray::{s, Array3, Array4, Axis};
use ordered_float::OrderedFloat;
use std::borrow::Cow;

/// Pressure level (hPa) taken as the surface for fields with a vertical dimension.
pub const SURFACE_LEVEL: f64 = 1000.0;

/// A time-indexed scalar field on a regular longitude/latitude grid.
///
/// Values are stored as `(time, level, lat, lon)`. Fields without a vertical
/// dimension have `levels == None` and a level axis of length one.
#[derive(Debug, Clone)]
pub struct GridField {
    pub name: String,
    pub times: Vec<NaiveDateTime>,
    pub levels: Option<Vec<f64>>,
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
    pub values: Array4<f64>,
}

impl GridField {
    /// Builds a field from flat row-major values in `(time, level, lat, lon)` order.
    pub fn from_flat(
        name: impl Into<String>,
        times: Vec<NaiveDateTime>,
        levels: Option<Vec<f64>>,
        lats: Vec<f64>,
        lons: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self, ClimateError> {
        let name = name.into();
        let n_levels = levels.as_ref().map_or(1, Vec::len);
        let shape = (times.len(), n_levels, lats.len(), lons.len());
        let values = Array4::from_shape_vec(shape, values).map_err(|e| {
            ClimateError::ShapeMismatch {
                field: name.clone(),
                source: e,
            }
        })?;
        Ok(Self {
            name,
            times,
            levels,
            lats,
            lons,
            values,
        })
    }

    /// Builds a single-level field from `(time, lat, lon)` values.
    pub fn surface(
        name: impl Into<String>,
        times: Vec<NaiveDateTime>,
        lats: Vec<f64>,
        lons: Vec<f64>,
        values: Array3<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            times,
            levels: None,
            lats,
            lons,
            values: values.insert_axis(Axis(1)),
        }
    }

    pub fn has_levels(&self) -> bool {
        self.levels.is_some()
    }

    /// Returns a single-level copy of this field at `level`.
    pub fn select_level(&self, level: f64) -> Result<GridField, ClimateError> {
        let index = self
            .levels
            .as_ref()
            .and_then(|levels| levels.iter().position(|l| (l - level).abs() < 1e-9))
            .ok_or_else(|| ClimateError::LevelNotFound {
                field: self.name.clone(),
                level,
            })?;
        let values = self
            .values
            .index_axis(Axis(1), index)
            .insert_axis(Axis(1))
            .to_owned();
        Ok(GridField {
            name: self.name.clone(),
            times: self.times.clone(),
            levels: None,
            lats: self.lats.clone(),
            lons: self.lons.clone(),
            values,
        })
    }

    /// Picks [`SURFACE_LEVEL`] when the field has a vertical dimension, otherwise
    /// borrows the field unchanged.
    pub fn select_surface(&self) -> Result<Cow<'_, GridField>, ClimateError> {
        if self.has_levels() {
            Ok(Cow::Owned(self.select_level(SURFACE_LEVEL)?))
        } else {
            Ok(Cow::Borrowed(self))
        }
    }

    /// The time series at the grid point nearest to `(lon, lat)`.
    ///
    /// Longitude and latitude are matched independently. Points outside the grid
    /// resolve to the closest edge; longitudes are not wrapped. NaN or infinite
    /// coordinates have no nearest point and are an error.
    pub fn series_at(&self, lon: f64, lat: f64) -> Result<Vec<f64>, ClimateError> {
        if self.has_levels() {
            return Err(ClimateError::LevelNotSelected(self.name.clone()));
        }
        if !(lon.is_finite() && lat.is_finite()) {
            return Err(ClimateError::NonFiniteCoordinate {
                field: self.name.clone(),
                lon,
                lat,
            });
        }
        let lon_index =
            nearest_index(&self.lons, lon).ok_or_else(|| ClimateError::EmptyGrid(self.name.clone()))?;
        let lat_index =
            nearest_index(&self.lats, lat).ok_or_else(|| ClimateError::EmptyGrid(self.name.clone()))?;
        Ok(self.values.slice(s![.., 0, lat_index, lon_index]).to_vec())
    }
}

/// Index of the coordinate closest to `target`; the first one wins on ties.
///
/// Works for ascending and descending axes alike. Returns `None` for an empty axis
/// and for a non-finite target.
pub fn nearest_index(coords: &[f64], target: f64) -> Option<usize> {
    if !target.is_finite() {
        return None;
    }
    coords
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| OrderedFloat((*c - target).abs()))
        .map(|(i, _)| i)
}
