use chrono::NaiveDate;
use climate_pain::{add_year_season, merge_weather_with_health, SeasonalFrame, WeatherVariable};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polars::prelude::*;

const COUNTRIES: usize = 150;
const YEARS: i32 = 40;

fn monthly_observations(column: &str) -> PolarsResult<DataFrame> {
    let mut time = Vec::new();
    let mut iso = Vec::new();
    let mut value = Vec::new();
    for c in 0..COUNTRIES {
        for y in 0..YEARS {
            for m in 1..=12 {
                let ts = NaiveDate::from_ymd_opt(1960 + y, m, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc().timestamp_millis())
                    .unwrap_or_default();
                time.push(ts);
                iso.push(format!("C{:03}", c));
                value.push(c as f64 + f64::from(m));
            }
        }
    }
    let time = Column::new("time".into(), time)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    DataFrame::new(vec![
        time,
        Column::new(column.into(), value),
        Column::new("iso_a3".into(), iso),
    ])
}

fn health_table() -> PolarsResult<DataFrame> {
    let mut iso = Vec::new();
    let mut year = Vec::new();
    let mut season = Vec::new();
    for c in 0..COUNTRIES {
        for y in 0..YEARS {
            for s in ["DJF", "MAM", "JJA", "SON"] {
                iso.push(format!("C{:03}", c));
                year.push(1960 + i64::from(y));
                season.push(s);
            }
        }
    }
    let n = iso.len();
    df!(
        "iso_a3" => iso,
        "year" => year,
        "season" => season,
        "cause" => vec!["Low back pain"; n],
        "metric" => vec!["Rate"; n],
        "val" => vec![1.0f64; n],
    )
}

fn bench_pipeline(c: &mut Criterion) {
    let observations = WeatherVariable::ALL.map(|v| monthly_observations(v.column()));
    let [Ok(air), Ok(slp), Ok(shum)] = observations else {
        panic!("failed to build observation fixtures");
    };
    let health = health_table().expect("health fixture");

    c.bench_function("add_year_season", |b| {
        b.iter(|| add_year_season(black_box(&air), "air_C"))
    });

    let seasonal = |df: &DataFrame, v: WeatherVariable| {
        SeasonalFrame::new(v, add_year_season(df, v.column()).expect("seasonal fixture"))
    };
    let air_s = seasonal(&air, WeatherVariable::Temperature);
    let slp_s = seasonal(&slp, WeatherVariable::Pressure);
    let shum_s = seasonal(&shum, WeatherVariable::Humidity);
    c.bench_function("merge_weather_with_health", |b| {
        b.iter(|| merge_weather_with_health(black_box(&health), &air_s, &slp_s, &shum_s))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
