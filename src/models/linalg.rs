//! Normal-equation solves shared by the OLS and mixed-model fits.

use crate::models::error::FitError;
use nalgebra::{DMatrix, DVector};

// Pivots of the column-equilibrated Cholesky factor below this are treated as collinearity.
const PIVOT_TOLERANCE: f64 = 1e-7;

/// Solution of `A b = r` for a symmetric positive-definite cross-product matrix `A`.
#[derive(Debug, Clone)]
pub struct NormalSolution {
    pub coefficients: DVector<f64>,
    pub inverse: DMatrix<f64>,
    pub log_det: f64,
}

/// Solves the normal equations `xtx * b = xty`.
///
/// The matrix is equilibrated by its diagonal before factorising, so the singularity
/// check is independent of the regressors' units.
pub fn solve_normal(
    model: &'static str,
    xtx: &DMatrix<f64>,
    xty: &DVector<f64>,
) -> Result<NormalSolution, FitError> {
    let p = xtx.nrows();
    let scale: Vec<f64> = (0..p).map(|j| xtx[(j, j)].sqrt()).collect();
    if scale.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
        return Err(FitError::Singular { model });
    }

    let equilibrated = DMatrix::from_fn(p, p, |i, j| xtx[(i, j)] / (scale[i] * scale[j]));
    let cholesky = equilibrated.cholesky().ok_or(FitError::Singular { model })?;
    let pivots = cholesky.l_dirty().diagonal();
    if pivots.iter().any(|d| !(*d > PIVOT_TOLERANCE)) {
        return Err(FitError::Singular { model });
    }

    let inner_inverse = cholesky.inverse();
    let inverse = DMatrix::from_fn(p, p, |i, j| inner_inverse[(i, j)] / (scale[i] * scale[j]));
    let coefficients = &inverse * xty;
    let log_det = 2.0 * pivots.iter().map(|d| d.ln()).sum::<f64>()
        + 2.0 * scale.iter().map(|s| s.ln()).sum::<f64>();

    Ok(NormalSolution {
        coefficients,
        inverse,
        log_det,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solves_well_conditioned_system() -> Result<(), Box<dyn std::error::Error>> {
        let xtx = DMatrix::from_row_slice(2, 2, &[4.0, 2.0, 2.0, 3.0]);
        let xty = DVector::from_vec(vec![6.0, 5.0]);
        let solution = solve_normal("test", &xtx, &xty)?;

        assert!((solution.coefficients[0] - 1.0).abs() < 1e-12);
        assert!((solution.coefficients[1] - 1.0).abs() < 1e-12);
        assert!((solution.log_det - 8.0f64.ln()).abs() < 1e-12);
        let identity = &xtx * &solution.inverse;
        assert!((identity - DMatrix::<f64>::identity(2, 2)).norm() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_collinear_columns_are_singular() {
        // columns x and 1000x
        let xtx = DMatrix::from_row_slice(2, 2, &[14.0, 14000.0, 14000.0, 14_000_000.0]);
        let xty = DVector::from_vec(vec![1.0, 1000.0]);
        assert!(matches!(
            solve_normal("test", &xtx, &xty),
            Err(FitError::Singular { .. })
        ));

        let zero = DMatrix::from_row_slice(1, 1, &[0.0]);
        assert!(matches!(
            solve_normal("test", &zero, &DVector::from_vec(vec![0.0])),
            Err(FitError::Singular { .. })
        ));
    }
}
