//! Scalar 1-D Kalman filter for price smoothing.
//!
//! Constant-state model with fixed process and measurement noise. The state
//! is seeded with the first observation, so the output is defined from
//! index 0.

/// Filtered estimate for each observation.
pub fn kalman_filter(values: &[f64], process_noise: f64, measurement_noise: f64) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if n == 0 {
        return out;
    }

    let mut estimate = values[0];
    let mut error_cov = 1.0;
    out[0] = estimate;
    for i in 1..n {
        // Predict
        error_cov += process_noise;
        // Update
        let gain = error_cov / (error_cov + measurement_noise);
        estimate += gain * (values[i] - estimate);
        error_cov *= 1.0 - gain;
        out[i] = estimate;
    }
    out
}
