/// GELU (Gaussian Error Linear Unit) activation function
pub struct Gelu;

impl Gelu {
    /// Approximation of GELU using tanh
    /// GELU(x) ≈ 0.5 * x * (1 + tanh(sqrt(2/π) * (x + 0.044715 * x^3)))
    #[inline]
    pub fn value(x: f32) -> f32 {
        let sqrt_2_over_pi = (2.0_f32 / std::f32::consts::PI).sqrt();
        let inner = sqrt_2_over_pi * (x + 0.044715 * x.powi(3));
        0.5 * x * (1.0 + inner.tanh())
    }
}
