//! Activation function types.

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types.
///
/// This is a closed set; the serialized model format stores the variant
/// name, so the serde representation doubles as the name mapping for
/// persistence.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Activator {
    /// Sigmoid function
    Sigmoid,
    /// Hyperbolic tan function
    Tanh,
    /// Rectified Linear Unit
    ReLU,
    /// Smooth approximation of ReLU
    Softplus,
}

impl Activator {
    /// Evaluates `f(x)` for the selected activation function.
    pub fn f(&self, x: f64) -> f64 {
        match self {
            &Activator::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            &Activator::Tanh => 2.0 / (1.0 + (-2.0 * x).exp()) - 1.0,
            &Activator::ReLU => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            &Activator::Softplus => (1.0 + x.exp()).ln(),
        }
    }

    /// Evaluates the derivative `f'(x)`, where `x = f^{-1}(y)`.
    ///
    /// Note that this function takes in the *output* of the activation
    /// function, rather than the input. This is an optimization that means we
    /// don't have to store the intermediate results before activation.
    pub fn fprime(&self, y: f64) -> f64 {
        match self {
            &Activator::Sigmoid => y * (1.0 - y),
            &Activator::Tanh => 1.0 - y * y,
            &Activator::ReLU => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            &Activator::Softplus => 1.0 - (-y).exp(),
        }
    }

    /// Returns the stable name of this activator, matching the string used
    /// by the serialized model format.
    pub fn name(&self) -> &'static str {
        match self {
            &Activator::Sigmoid => "Sigmoid",
            &Activator::Tanh => "Tanh",
            &Activator::ReLU => "ReLU",
            &Activator::Softplus => "Softplus",
        }
    }
}
