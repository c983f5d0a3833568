//! Seasonal means of monthly observations.

use crate::types::season::Season;
use log::info;
use polars::prelude::*;

/// Key columns shared by seasonal aggregates and the health dataset.
pub const SEASON_KEYS: [&str; 3] = ["iso_a3", "year", "season"];

/// Maps an integer month expression to the season label, using the same table as
/// [`crate::month_to_season`].
pub fn season_expr(month: Expr) -> Expr {
    let in_season = |season: Season| {
        season
            .months()
            .iter()
            .fold(lit(false), |acc, m| acc.or(month.clone().eq(lit(*m as i32))))
    };
    when(in_season(Season::Djf))
        .then(lit(Season::Djf.label()))
        .when(in_season(Season::Mam))
        .then(lit(Season::Mam.label()))
        .when(in_season(Season::Jja))
        .then(lit(Season::Jja.label()))
        .otherwise(lit(Season::Son.label()))
}

/// Groups observations by country, year and season and averages `value_col`.
///
/// `observations` must carry a datetime `time` column, an `iso_a3` column and the
/// value column. Nulls in the value column are skipped by the mean. The output has
/// columns `iso_a3, year (i64), season, <value_col>`, one row per key, sorted by key.
pub fn add_year_season(observations: &DataFrame, value_col: &str) -> PolarsResult<DataFrame> {
    let month = col("time").dt().month().cast(DataType::Int32);
    let seasonal = observations
        .clone()
        .lazy()
        .with_columns([
            col("time").dt().year().cast(DataType::Int64).alias("year"),
            season_expr(month).alias("season"),
        ])
        .group_by([col("iso_a3"), col("year"), col("season")])
        .agg([col(value_col).mean()])
        .sort(SEASON_KEYS, SortMultipleOptions::default())
        .collect()?;
    info!(
        "Aggregated {} '{}' observations into {} seasonal means",
        observations.height(),
        value_col,
        seasonal.height()
    );
    Ok(seasonal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn monthly_frame(iso: &str, year: i32, values: &[f64]) -> PolarsResult<DataFrame> {
        let times: Vec<i64> = (1..=values.len() as u32)
            .map(|m| {
                NaiveDate::from_ymd_opt(year, m, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    .and_utc()
                    .timestamp_millis()
            })
            .collect();
        let time = Series::new("time".into(), times)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        DataFrame::new(vec![
            time.into_column(),
            Column::new("air_C".into(), values.to_vec()),
            Column::new("iso_a3".into(), vec![iso; values.len()]),
        ])
    }

    #[test]
    fn test_twelve_months_give_four_seasonal_means() -> Result<(), Box<dyn std::error::Error>> {
        let values: Vec<f64> = (1..=12).map(f64::from).collect();
        let df = add_year_season(&monthly_frame("USA", 2000, &values)?, "air_C")?;

        assert_eq!(df.height(), 4);
        assert_eq!(df.get_column_names_str(), ["iso_a3", "year", "season", "air_C"]);
        assert_eq!(df.column("year")?.dtype(), &DataType::Int64);

        let seasons: Vec<&str> = df.column("season")?.str()?.into_iter().flatten().collect();
        let means: Vec<f64> = df.column("air_C")?.f64()?.into_iter().flatten().collect();
        let by_season: Vec<(&str, f64)> = seasons.into_iter().zip(means).collect();
        // DJF within the same calendar year: Jan, Feb and Dec
        assert_eq!(
            by_season,
            vec![
                ("DJF", (1.0 + 2.0 + 12.0) / 3.0),
                ("JJA", 7.0),
                ("MAM", 4.0),
                ("SON", 10.0),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_countries_and_years_are_kept_apart() -> Result<(), Box<dyn std::error::Error>> {
        let mut frame = monthly_frame("USA", 2000, &[1.0, 1.0, 1.0])?;
        frame.vstack_mut(&monthly_frame("USA", 2001, &[3.0, 3.0, 3.0])?)?;
        frame.vstack_mut(&monthly_frame("FRA", 2000, &[5.0, 5.0, 5.0])?)?;

        let df = add_year_season(&frame, "air_C")?;
        // Jan+Feb (DJF) and Mar (MAM) for each of the three country-years
        assert_eq!(df.height(), 6);
        let first_iso = df.column("iso_a3")?.str()?.get(0);
        assert_eq!(first_iso, Some("FRA"));
        Ok(())
    }

    #[test]
    fn test_season_expr_matches_month_to_season() -> Result<(), Box<dyn std::error::Error>> {
        let months: Vec<i32> = (1..=12).collect();
        let df = df!("month" => months.clone())?
            .lazy()
            .select([season_expr(col("month")).alias("season")])
            .collect()?;
        let labels: Vec<&str> = df.column("season")?.str()?.into_iter().flatten().collect();
        for (month, label) in months.iter().zip(labels) {
            assert_eq!(crate::month_to_season(*month as u32).label(), label);
        }
        Ok(())
    }
}
