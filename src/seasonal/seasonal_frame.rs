//! Contains the `SeasonalFrame` structure wrapping one variable's seasonal means.

use crate::types::weather_variable::WeatherVariable;
use polars::prelude::{col, lit, DataFrame, Expr, IntoLazy, LazyFrame, PolarsResult};

/// A seasonal-mean table (`iso_a3, year, season, <value>`) tagged with its variable.
///
/// Filters are built lazily, as with any Polars `LazyFrame`; nothing is computed
/// until `.collect()` is called on the returned frame.
///
/// # Example
///
/// ```
/// use climate_pain::{SeasonalFrame, WeatherVariable};
/// use polars::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let df = df!(
///     "iso_a3" => ["USA", "USA", "USA"],
///     "year" => [1999i64, 2000, 2001],
///     "season" => ["DJF", "JJA", "JJA"],
///     "air_C" => [1.0, 22.0, 23.5],
/// )?;
/// let seasonal = SeasonalFrame::new(WeatherVariable::Temperature, df);
///
/// let recent = seasonal.for_years(2000, 2001).collect()?;
/// assert_eq!(recent.height(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SeasonalFrame {
    pub variable: WeatherVariable,
    pub frame: DataFrame,
}

impl SeasonalFrame {
    pub fn new(variable: WeatherVariable, frame: DataFrame) -> Self {
        Self { variable, frame }
    }

    /// An empty table with the seasonal schema for `variable`.
    pub fn empty(variable: WeatherVariable) -> PolarsResult<Self> {
        use polars::prelude::{Column, DataType};
        let frame = DataFrame::new(vec![
            Column::new_empty("iso_a3".into(), &DataType::String),
            Column::new_empty("year".into(), &DataType::Int64),
            Column::new_empty("season".into(), &DataType::String),
            Column::new_empty(variable.column().into(), &DataType::Float64),
        ])?;
        Ok(Self::new(variable, frame))
    }

    pub fn value_column(&self) -> &'static str {
        self.variable.column()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    /// Applies an arbitrary Polars predicate.
    pub fn filter(&self, predicate: Expr) -> LazyFrame {
        self.lazy().filter(predicate)
    }

    /// Rows whose year lies in `start..=end`.
    pub fn for_years(&self, start: i64, end: i64) -> LazyFrame {
        self.filter(col("year").gt_eq(lit(start)).and(col("year").lt_eq(lit(end))))
    }
}
