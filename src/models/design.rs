//! Design-matrix construction with formula-style column naming.

use crate::models::error::FitError;
use nalgebra::DMatrix;

/// A dense design matrix and the names of its columns.
#[derive(Debug, Clone)]
pub struct Design {
    pub names: Vec<String>,
    pub matrix: DMatrix<f64>,
}

impl Design {
    pub fn builder(rows: usize) -> DesignBuilder {
        DesignBuilder {
            rows,
            names: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn nobs(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn nparams(&self) -> usize {
        self.matrix.ncols()
    }
}

/// Adds columns one term at a time, in the order they appear in a model formula.
#[derive(Debug, Clone)]
pub struct DesignBuilder {
    rows: usize,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl DesignBuilder {
    pub fn intercept(mut self) -> Self {
        self.names.push("Intercept".to_string());
        self.columns.push(vec![1.0; self.rows]);
        self
    }

    pub fn numeric(mut self, name: &str, values: Vec<f64>) -> Self {
        self.names.push(name.to_string());
        self.columns.push(values);
        self
    }

    /// Treatment-coded categorical term `C(name)`.
    ///
    /// Levels are the distinct values sorted lexically; the first is the reference
    /// level and gets no column. Each other level `L` becomes an indicator column
    /// named `C(name)[T.L]`.
    pub fn categorical(mut self, name: &str, values: &[&str]) -> Self {
        let mut levels: Vec<&str> = values.to_vec();
        levels.sort_unstable();
        levels.dedup();
        for level in levels.iter().skip(1) {
            self.names.push(format!("C({})[T.{}]", name, level));
            self.columns
                .push(values.iter().map(|v| f64::from(u8::from(v == level))).collect());
        }
        self
    }

    pub fn build(self) -> Result<Design, FitError> {
        for (name, column) in self.names.iter().zip(&self.columns) {
            if column.len() != self.rows {
                return Err(FitError::ColumnLength {
                    name: name.clone(),
                    expected: self.rows,
                    found: column.len(),
                });
            }
        }
        let columns = self.columns;
        let matrix = DMatrix::from_fn(self.rows, columns.len(), |i, j| columns[j][i]);
        Ok(Design {
            names: self.names,
            matrix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_treatment_coding_uses_first_sorted_level_as_reference() -> Result<(), Box<dyn std::error::Error>> {
        let seasons = ["MAM", "DJF", "SON", "DJF"];
        let design = Design::builder(4)
            .intercept()
            .categorical("season", &seasons)
            .numeric("air_C", vec![1.0, 2.0, 3.0, 4.0])
            .build()?;

        assert_eq!(
            design.names,
            ["Intercept", "C(season)[T.MAM]", "C(season)[T.SON]", "air_C"]
        );
        assert_eq!(design.nobs(), 4);
        assert_eq!(design.nparams(), 4);
        // row 0 is MAM, row 2 is SON, rows 1 and 3 are the DJF reference
        let column = |j: usize| design.matrix.column(j).iter().copied().collect::<Vec<f64>>();
        assert_eq!(column(1), vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(column(2), vec![0.0, 0.0, 1.0, 0.0]);
        assert_eq!(design.matrix[(3, 3)], 4.0);
        Ok(())
    }

    #[test]
    fn test_single_level_adds_no_columns() -> Result<(), Box<dyn std::error::Error>> {
        let design = Design::builder(2)
            .intercept()
            .categorical("season", &["JJA", "JJA"])
            .build()?;
        assert_eq!(design.names, ["Intercept"]);
        Ok(())
    }

    #[test]
    fn test_column_length_is_checked() {
        let result = Design::builder(3).numeric("x", vec![1.0]).build();
        assert!(matches!(result, Err(FitError::ColumnLength { expected: 3, found: 1, .. })));
    }
}
