//! Writes fitted model summaries to one text file per (weather variable, cause).

use crate::models::mixed::MixedLmFit;
use crate::models::runner::{ModelResults, ResidualFit};
use crate::summaries::error::SummaryError;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

pub const RESIDUAL_PREFIX: &str = "residual_";
pub const BASE_MODEL_HEADER: &str = "Base model: val ~ GDP_per_capita + HAQ_index\n\n";
pub const RESIDUAL_SECTION_HEADER: &str = "\n\nWeather on residuals:\n\n";

/// `<prefix><Label>_<Cause>.txt` with spaces and path separators replaced by `_`.
///
/// ```
/// use climate_pain::summary_file_name;
///
/// assert_eq!(
///     summary_file_name("Specific humidity (kg/kg)", "Low back pain", "residual_"),
///     "residual_Specific_humidity_(kg_kg)_Low_back_pain.txt"
/// );
/// ```
pub fn summary_file_name(label: &str, cause: &str, prefix: &str) -> String {
    let sanitize = |s: &str| s.replace([' ', '/', '\\'], "_");
    format!("{}{}_{}.txt", prefix, sanitize(label), sanitize(cause))
}

/// Writes one mixed-model summary per result into `dir`, returning the written paths.
pub fn save_model_summaries(
    results: &ModelResults<MixedLmFit>,
    dir: &Path,
) -> Result<Vec<PathBuf>, SummaryError> {
    ensure_dir(dir)?;
    let mut written = Vec::with_capacity(results.len());
    for (key, fit) in results {
        let path = dir.join(summary_file_name(key.variable.label(), &key.cause, ""));
        write_file(&path, &fit.to_string())?;
        written.push(path);
    }
    info!("Wrote {} model summaries to {}", written.len(), dir.display());
    Ok(written)
}

/// Writes one two-section residual summary per result into `dir`.
pub fn save_residual_summaries(
    results: &ModelResults<ResidualFit>,
    dir: &Path,
) -> Result<Vec<PathBuf>, SummaryError> {
    ensure_dir(dir)?;
    let mut written = Vec::with_capacity(results.len());
    for (key, fit) in results {
        let path = dir.join(summary_file_name(
            key.variable.label(),
            &key.cause,
            RESIDUAL_PREFIX,
        ));
        let contents = format!(
            "{}{}{}{}",
            BASE_MODEL_HEADER, fit.base, RESIDUAL_SECTION_HEADER, fit.weather
        );
        write_file(&path, &contents)?;
        written.push(path);
    }
    info!("Wrote {} residual summaries to {}", written.len(), dir.display());
    Ok(written)
}

fn ensure_dir(dir: &Path) -> Result<(), SummaryError> {
    fs::create_dir_all(dir).map_err(|e| SummaryError::DirCreation(dir.to_path_buf(), e))
}

// fs::write truncates, so reruns replace earlier summaries.
fn write_file(path: &Path, contents: &str) -> Result<(), SummaryError> {
    fs::write(path, contents).map_err(|e| SummaryError::Write(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::design::Design;
    use crate::models::ols::fit_ols;
    use crate::models::runner::ResultKey;
    use crate::types::weather_variable::WeatherVariable;
    use nalgebra::DVector;
    use tempfile::tempdir;

    fn residual_results() -> Result<ModelResults<ResidualFit>, Box<dyn std::error::Error>> {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = DVector::from_vec(vec![2.1, 3.9, 6.2, 7.8, 10.1]);
        let design = Design::builder(5).intercept().numeric("GDP_per_capita", x).build()?;
        let base = fit_ols("val", &y, &design)?;
        let weather = fit_ols("resid", &base.resid, &design)?;

        let mut results = ModelResults::new();
        results.insert(
            ResultKey::new(WeatherVariable::Temperature, "Low back pain"),
            ResidualFit {
                base: base.clone(),
                weather: weather.clone(),
            },
        );
        results.insert(
            ResultKey::new(WeatherVariable::Humidity, "Neck pain"),
            ResidualFit { base, weather },
        );
        Ok(results)
    }

    #[test]
    fn test_summary_file_names() {
        assert_eq!(
            summary_file_name("Temperature (C)", "Low back pain", ""),
            "Temperature_(C)_Low_back_pain.txt"
        );
        assert_eq!(
            summary_file_name("Sea-level pressure (hPa)", "Neck pain", RESIDUAL_PREFIX),
            "residual_Sea-level_pressure_(hPa)_Neck_pain.txt"
        );
    }

    #[test]
    fn test_residual_files_have_both_sections() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let out = dir.path().join("residual_results");
        let written = save_residual_summaries(&residual_results()?, &out)?;

        assert_eq!(written.len(), 2);
        let text = fs::read_to_string(out.join("residual_Temperature_(C)_Low_back_pain.txt"))?;
        assert!(text.starts_with(BASE_MODEL_HEADER));
        let split = text.find("Weather on residuals:").ok_or("missing weather section")?;
        assert!(text[..split].contains("Dep. Variable:"));
        assert!(text[split..].contains("resid"));
        assert!(out
            .join("residual_Specific_humidity_(kg_kg)_Neck_pain.txt")
            .is_file());
        Ok(())
    }

    #[test]
    fn test_rerun_overwrites_in_place() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let results = residual_results()?;
        save_residual_summaries(&results, dir.path())?;
        let first = fs::read_to_string(dir.path().join("residual_Temperature_(C)_Low_back_pain.txt"))?;
        save_residual_summaries(&results, dir.path())?;
        let second = fs::read_to_string(dir.path().join("residual_Temperature_(C)_Low_back_pain.txt"))?;

        assert_eq!(first, second);
        assert_eq!(fs::read_dir(dir.path())?.count(), 2);
        Ok(())
    }
}
