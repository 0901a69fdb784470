//! Closed-form ridge regression over standardized features.

use ndarray::{Array1, Array2, Axis};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RidgeError {
    #[error("model has not been fitted yet")]
    NotFitted,
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("invalid alpha value: {0}")]
    InvalidAlpha(f64),
    #[error("cannot fit on an empty design matrix")]
    Empty,
    #[error("system matrix is not positive definite")]
    NotPositiveDefinite,
}

/// Per-column z-scoring; near-constant columns keep unit scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl Standardizer {
    pub fn fit(x: &Array2<f64>) -> Result<Self, RidgeError> {
        let mean = x.mean_axis(Axis(0)).ok_or(RidgeError::Empty)?;
        let std = x
            .std_axis(Axis(0), 0.0)
            .mapv(|value| if value < 1e-12 { 1.0 } else { value });
        Ok(Self { mean, std })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, RidgeError> {
        if x.ncols() != self.mean.len() {
            return Err(RidgeError::DimensionMismatch {
                expected: self.mean.len(),
                got: x.ncols(),
            });
        }
        Ok((x - &self.mean) / &self.std)
    }
}

/// Minimizes `||y - Xb - c||² + alpha ||b||²`; the intercept is not penalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeRegression {
    alpha: f64,
    coefficients: Option<Array1<f64>>,
    intercept: Option<f64>,
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            coefficients: None,
            intercept: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    /// Solves `(X'X + alpha I) b = X'y` on centered data.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), RidgeError> {
        if self.alpha.is_nan() || self.alpha < 0.0 {
            return Err(RidgeError::InvalidAlpha(self.alpha));
        }
        if x.nrows() != y.len() {
            return Err(RidgeError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }

        let x_mean = x.mean_axis(Axis(0)).ok_or(RidgeError::Empty)?;
        let y_mean = y.mean().ok_or(RidgeError::Empty)?;
        let x_centered = x - &x_mean;
        let y_centered = y - y_mean;

        let mut system = x_centered.t().dot(&x_centered);
        for index in 0..system.nrows() {
            system[[index, index]] += self.alpha;
        }
        let rhs = x_centered.t().dot(&y_centered);

        let coefficients = cholesky_solve(&system, &rhs)?;
        self.intercept = Some(y_mean - x_mean.dot(&coefficients));
        self.coefficients = Some(coefficients);
        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, RidgeError> {
        let coefficients = self.coefficients.as_ref().ok_or(RidgeError::NotFitted)?;
        let intercept = self.intercept.ok_or(RidgeError::NotFitted)?;
        if x.ncols() != coefficients.len() {
            return Err(RidgeError::DimensionMismatch {
                expected: coefficients.len(),
                got: x.ncols(),
            });
        }
        Ok(x.dot(coefficients) + intercept)
    }
}

fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, RidgeError> {
    let n = a.nrows();
    let mut lower = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let sum = (0..j).map(|k| lower[[i, k]] * lower[[j, k]]).sum::<f64>();
            if i == j {
                let diagonal = a[[i, i]] - sum;
                if diagonal <= 0.0 || !diagonal.is_finite() {
                    return Err(RidgeError::NotPositiveDefinite);
                }
                lower[[i, j]] = diagonal.sqrt();
            } else {
                lower[[i, j]] = (a[[i, j]] - sum) / lower[[j, j]];
            }
        }
    }

    // L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum = (0..i).map(|j| lower[[i, j]] * z[j]).sum::<f64>();
        z[i] = (b[i] - sum) / lower[[i, i]];
    }

    // L' x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum = ((i + 1)..n).map(|j| lower[[j, i]] * x[j]).sum::<f64>();
        x[i] = (z[i] - sum) / lower[[i, i]];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn tiny_alpha_recovers_exact_linear_relation() {
        let x = array![[1.0, 0.0], [2.0, 1.0], [3.0, 0.0], [4.0, 1.0], [5.0, 3.0]];
        let y = x.column(0).mapv(|v| 2.0 * v) + x.column(1).mapv(|v| -1.0 * v) + 0.5;

        let mut model = RidgeRegression::new(1e-9);
        model.fit(&x, &y).expect("fits");
        let coefficients = model.coefficients().expect("fitted");
        assert!((coefficients[0] - 2.0).abs() < 1e-6);
        assert!((coefficients[1] + 1.0).abs() < 1e-6);

        let predicted = model.predict(&array![[10.0, 2.0]]).expect("predicts");
        assert!((predicted[0] - 18.5).abs() < 1e-5);
    }

    #[test]
    fn larger_alpha_shrinks_coefficients() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut loose = RidgeRegression::new(0.01);
        let mut tight = RidgeRegression::new(100.0);
        loose.fit(&x, &y).expect("fits");
        tight.fit(&x, &y).expect("fits");

        let loose = loose.coefficients().expect("fitted")[0];
        let tight = tight.coefficients().expect("fitted")[0];
        assert!(tight.abs() < loose.abs());
    }

    #[test]
    fn rejects_unfitted_and_mismatched_input() {
        let model = RidgeRegression::new(1.0);
        assert_eq!(model.predict(&array![[1.0]]), Err(RidgeError::NotFitted));

        let mut model = RidgeRegression::new(-1.0);
        assert_eq!(
            model.fit(&array![[1.0]], &array![1.0]),
            Err(RidgeError::InvalidAlpha(-1.0))
        );
    }

    #[test]
    fn standardizer_centers_and_scales() {
        let x = array![[1.0, 5.0], [3.0, 5.0]];
        let scaler = Standardizer::fit(&x).expect("fits");
        let z = scaler.transform(&x).expect("transforms");
        assert_eq!(z, array![[-1.0, 0.0], [1.0, 0.0]]);
    }
}
