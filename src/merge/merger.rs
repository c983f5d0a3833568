//! Left-joins seasonal weather means onto the health dataset.

use crate::merge::error::MergeError;
use crate::seasonal::aggregate::SEASON_KEYS;
use crate::seasonal::seasonal_frame::SeasonalFrame;
use log::{info, warn};
use polars::prelude::*;

const ROW_INDEX: &str = "__health_row";

fn key_exprs() -> [Expr; 3] {
    [col("iso_a3"), col("year"), col("season")]
}

fn normalized_keys() -> [Expr; 3] {
    [
        col("iso_a3").cast(DataType::String),
        col("year").cast(DataType::Int64),
        col("season").cast(DataType::String),
    ]
}

/// First and last year present in the health dataset, `None` when all are null.
fn health_year_span(health: &DataFrame) -> Result<Option<(i64, i64)>, MergeError> {
    let key_type = |source| MergeError::KeyType {
        column: "year".to_string(),
        source,
    };
    let years = health
        .column("year")
        .and_then(|c| c.cast(&DataType::Int64))
        .map_err(key_type)?;
    let years = years.i64().map_err(key_type)?;
    Ok(years.min().zip(years.max()))
}

/// Merges the three seasonal tables onto `health` by (iso_a3, year, season).
///
/// Each join is a left join, so every health row is kept, in its original order,
/// and unmatched keys leave the weather column null. Key columns are cast to
/// `String`/`Int64`/`String` on both sides first, so tables read from CSV and tables
/// computed in memory join alike. Seasonal rows outside the health dataset's year
/// span are dropped before joining.
///
/// Each seasonal table must hold at most one row per key. Duplicate keys would
/// multiply health rows, so they are rejected with [`MergeError::RowCountChanged`]
/// instead of being merged.
pub fn merge_weather_with_health(
    health: &DataFrame,
    air: &SeasonalFrame,
    slp: &SeasonalFrame,
    shum: &SeasonalFrame,
) -> Result<DataFrame, MergeError> {
    for key in SEASON_KEYS {
        health
            .column(key)
            .map_err(|e| MergeError::MissingKey(key.to_string(), e))?;
    }

    let mut output_columns: Vec<Expr> = health
        .get_column_names()
        .into_iter()
        .map(|name| col(name.clone()))
        .collect();

    let year_span = health_year_span(health)?;
    let mut merged = health
        .clone()
        .lazy()
        .with_columns(normalized_keys())
        .with_row_index(ROW_INDEX, None);

    for seasonal in [air, slp, shum] {
        let value = seasonal.value_column();
        if seasonal.height() == 0 {
            warn!("No seasonal '{}' data; column will be all null", value);
        }
        let [iso, year, season] = normalized_keys();
        let source = match year_span {
            Some((first, last)) => seasonal.for_years(first, last),
            None => seasonal.lazy(),
        };
        let right = source
            .select([iso, year, season, col(value).cast(DataType::Float64)]);
        merged = merged.join(right, key_exprs(), key_exprs(), JoinArgs::new(JoinType::Left));
        output_columns.push(col(value));
    }

    let merged = merged
        .sort([ROW_INDEX], SortMultipleOptions::default())
        .select(output_columns)
        .collect()
        .map_err(|e| MergeError::Join {
            column: [air, slp, shum]
                .iter()
                .map(|s| s.value_column())
                .collect::<Vec<_>>()
                .join(", "),
            source: e,
        })?;

    if merged.height() != health.height() {
        return Err(MergeError::RowCountChanged {
            expected: health.height(),
            found: merged.height(),
        });
    }
    info!(
        "Merged weather onto {} health rows ({} columns)",
        merged.height(),
        merged.width()
    );
    Ok(merged)
}
