/// Logistic sigmoid, `1 / (1 + e^-x)`.
pub fn function(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid taken at the pre-activation value `x`
/// (not at an already-activated output).
pub fn derivative(x: f64) -> f64 {
    let fx = function(x);
    fx * (1.0 - fx)
}
