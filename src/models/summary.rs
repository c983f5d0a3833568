//! Plain-text regression summaries in the familiar two-panel layout.

use std::fmt;

const MIN_NAME_WIDTH: usize = 16;
const HALF_KEY_WIDTH: usize = 20;

/// One coefficient row: name plus estimate, std. error, statistic, p-value and CI.
#[derive(Debug, Clone)]
pub struct CoefficientRow {
    pub name: String,
    pub values: [f64; 6],
}

/// A rendered summary: title, paired header statistics and a coefficient table.
#[derive(Debug, Clone)]
pub struct SummaryTable {
    pub title: &'static str,
    pub left: Vec<(&'static str, String)>,
    pub right: Vec<(&'static str, String)>,
    pub columns: [&'static str; 6],
    pub rows: Vec<CoefficientRow>,
    /// Rows printed after the coefficients with only an estimate, e.g. a variance component.
    pub trailing: Vec<(String, f64)>,
}

/// Formats a statistic with four decimals, switching to scientific notation for very
/// large or very small magnitudes.
pub fn format_stat(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || (1e-4..1e8).contains(&magnitude) || !value.is_finite() {
        format!("{:.4}", value)
    } else {
        format!("{:.4e}", value)
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .rows
            .iter()
            .map(|r| r.name.len())
            .chain(self.trailing.iter().map(|(n, _)| n.len()))
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_WIDTH - 1)
            + 1;
        let width = (name_width + 4 * 10 + 2 * 11).max(2 * (HALF_KEY_WIDTH + 19));
        let half = width / 2;

        writeln!(f, "{:^width$}", self.title)?;
        writeln!(f, "{}", "=".repeat(width))?;
        let lines = self.left.len().max(self.right.len());
        for i in 0..lines {
            let cell = |pairs: &[(&str, String)]| match pairs.get(i) {
                Some((key, value)) => format!(
                    "{:<kw$}{:>vw$}",
                    format!("{}:", key),
                    value,
                    kw = HALF_KEY_WIDTH,
                    vw = half - HALF_KEY_WIDTH
                ),
                None => " ".repeat(half),
            };
            writeln!(f, "{}{}", cell(self.left.as_slice()), cell(self.right.as_slice()).trim_end())?;
        }
        writeln!(f, "{}", "=".repeat(width))?;

        let [c0, c1, c2, c3, c4, c5] = self.columns;
        writeln!(
            f,
            "{:<nw$}{:>10}{:>10}{:>10}{:>10}{:>11}{:>11}",
            "",
            c0,
            c1,
            c2,
            c3,
            c4,
            c5,
            nw = name_width
        )?;
        writeln!(f, "{}", "-".repeat(width))?;
        for row in &self.rows {
            let [coef, se, stat, p, lo, hi] = row.values;
            writeln!(
                f,
                "{:<nw$}{:>10}{:>10}{:>10}{:>10}{:>11}{:>11}",
                row.name,
                format_stat(coef),
                format_stat(se),
                format!("{:.3}", stat),
                format!("{:.3}", p),
                format_stat(lo),
                format_stat(hi),
                nw = name_width
            )?;
        }
        for (name, value) in &self.trailing {
            writeln!(f, "{:<nw$}{:>10}", name, format_stat(*value), nw = name_width)?;
        }
        write!(f, "{}", "=".repeat(width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(0.0), "0.0000");
        assert_eq!(format_stat(1013.25), "1013.2500");
        assert_eq!(format_stat(0.00001234), "1.2340e-5");
        assert_eq!(format_stat(f64::NAN), "NaN");
    }

    #[test]
    fn test_layout_contains_rows_and_header() {
        let table = SummaryTable {
            title: "OLS Regression Results",
            left: vec![("Dep. Variable", "val".to_string())],
            right: vec![("R-squared", "0.5000".to_string()), ("AIC", "12.0000".to_string())],
            columns: ["coef", "std err", "t", "P>|t|", "[0.025", "0.975]"],
            rows: vec![CoefficientRow {
                name: "Intercept".to_string(),
                values: [1.0, 0.5, 2.0, 0.06, -0.1, 2.1],
            }],
            trailing: vec![("Group Var".to_string(), 0.25)],
        };
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("OLS Regression Results"));
        assert!(lines[2].starts_with("Dep. Variable:"));
        assert!(lines[2].contains("R-squared:"));
        assert!(lines[3].trim_start().starts_with("AIC:"));
        assert!(text.contains("P>|t|"));
        assert!(text.contains("Intercept"));
        assert!(text.contains("Group Var"));
        assert!(lines.last().unwrap().chars().all(|c| c == '='));
    }
}
