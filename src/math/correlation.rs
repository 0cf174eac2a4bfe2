//! Pearson product-moment correlation.
//!
//! We use the population form:
//!
//! ```text
//! r = cov(x, y) / (σ_x σ_y)
//! ```
//!
//! The `1/n` factors cancel, so the coefficient is identical to the sample form.
//! Inputs are centred on their means before accumulating, which keeps the sums
//! well conditioned for price series in the thousands.

/// Why a coefficient could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationError {
    /// Fewer than two paired observations.
    TooFewPoints(usize),
    /// Series lengths differ.
    LengthMismatch(usize, usize),
    /// One of the series is constant, so σ = 0.
    ZeroVariance,
}

impl std::fmt::Display for CorrelationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrelationError::TooFewPoints(n) => write!(f, "need at least 2 observations, got {n}"),
            CorrelationError::LengthMismatch(a, b) => write!(f, "series lengths differ ({a} vs {b})"),
            CorrelationError::ZeroVariance => write!(f, "series has zero variance"),
        }
    }
}

/// Pearson correlation coefficient of two equal-length series.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, CorrelationError> {
    if x.len() != y.len() {
        return Err(CorrelationError::LengthMismatch(x.len(), y.len()));
    }
    let n = x.len();
    if n < 2 {
        return Err(CorrelationError::TooFewPoints(n));
    }

    // Exact check first: the mean of a constant series is not always exact in
    // floating point, so the centred sums alone could leave a tiny σ.
    if is_constant(x) || is_constant(y) {
        return Err(CorrelationError::ZeroVariance);
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return Err(CorrelationError::ZeroVariance);
    }

    // Clamp away tiny overshoots like 1.0000000000000002.
    Ok((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Round to `decimals` places (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
