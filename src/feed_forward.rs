//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network) trained by
//! backpropagation with momentum.
//!
//! # Example
//!
//! Let's train a simple neural network to compute the XOR function:
//!
//! ```
//! use backprop::activator::Activator;
//! use backprop::feed_forward::Topology;
//! use backprop::initializer::TableInitializer;
//! use backprop::trainer::{Logging, Trainer};
//!
//! // Create examples of the XOR function
//! let examples = [([0.0, 0.0], [0.0]),
//!                 ([0.0, 1.0], [1.0]),
//!                 ([1.0, 0.0], [1.0]),
//!                 ([1.0, 1.0], [0.0])];
//!
//! // Fixed starting weights keep this example reproducible; use a
//! // `NormalInitializer` for real training runs.
//! let mut init = TableInitializer::new(
//!     &[0.65, -0.55, -0.45, 0.35, 0.25, 0.75, 0.6, -0.4, 0.2],
//!     &[0.0]);
//! let network = Topology::input(2)
//!     .layer(3, Activator::Sigmoid)
//!     .layer(1, Activator::Sigmoid)
//!     .build(&mut init)
//!     .unwrap();
//!
//! // Train the network on those examples
//! let trained = Trainer::new(network)
//!     .learning_rate(0.5)
//!     .momentum(0.9)
//!     .epochs(6000)
//!     .logging(Logging::Silent)
//!     .train(&examples[..])
//!     .unwrap();
//! assert!(trained.mean_cost < 0.01);
//!
//! // And verify the network correctly computes XOR!
//! fn classify(out: Vec<f64>) -> bool {
//!     out[0] > 0.5
//! }
//! let network = trained.network;
//! assert_eq!(classify(network.query(&[0.0, 0.0]).unwrap()), false);
//! assert_eq!(classify(network.query(&[0.0, 1.0]).unwrap()), true);
//! assert_eq!(classify(network.query(&[1.0, 0.0]).unwrap()), true);
//! assert_eq!(classify(network.query(&[1.0, 1.0]).unwrap()), false);
//! ```

use crate::activator::Activator;
use crate::error::{Error, Result};
use crate::initializer::Initializer;
use crate::layers::{Delta, Dense};
use crate::utils::{Back, Front};

/// Describes the shape of a network before it is built: the input width,
/// then one `(width, activator)` entry per layer in forward order.
#[derive(Clone, Debug)]
pub struct Topology {
    input_width: usize,
    layers: Vec<(usize, Activator)>,
}

impl Topology {
    /// Starts a topology whose networks accept `width` inputs.
    pub fn input(width: usize) -> Self {
        Topology {
            input_width: width,
            layers: Vec::new(),
        }
    }

    /// Appends a layer of `width` neurons using `activator`.
    pub fn layer(mut self, width: usize, activator: Activator) -> Self {
        self.layers.push((width, activator));
        self
    }

    /// Builds the described network, consulting `initializer` once per
    /// weight and bias slot, layers in forward order.
    ///
    /// Fails if the topology has no layers or any zero-width layer
    /// (index 0 names the network input).
    pub fn build<I>(self, initializer: &mut I) -> Result<Network>
    where
        I: Initializer + ?Sized,
    {
        if self.layers.is_empty() {
            return Err(Error::EmptyNetwork);
        }
        if self.input_width == 0 {
            return Err(Error::ZeroWidth { index: 0 });
        }
        for (i, &(width, _)) in self.layers.iter().enumerate() {
            if width == 0 {
                return Err(Error::ZeroWidth { index: i + 1 });
            }
        }

        let mut layers = Vec::with_capacity(self.layers.len());
        let mut inputs = self.input_width;
        for &(outputs, activator) in &self.layers {
            layers.push(Dense::new(activator, inputs, outputs, initializer));
            inputs = outputs;
        }
        Ok(Network { layers })
    }
}

/// A feedforward neural network: an ordered sequence of fully connected
/// layers, first to output.
///
/// The network owns its layers outright. Layers know only their own
/// shape; adjacency is positional.
#[derive(Debug)]
pub struct Network {
    layers: Vec<Dense>,
}

impl Network {
    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        self.layers.front().input_len()
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        self.layers.back().output_len()
    }

    /// Feeds the provided `input` through the network, returning the
    /// output layer's activations.
    ///
    /// Pure with respect to the network: no training side effects, and
    /// repeated identical calls return bit-identical output.
    pub fn query(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_len() {
            return Err(Error::ShapeMismatch {
                what: "network input",
                expected: self.input_len(),
                actual: input.len(),
            });
        }
        let mut activations = self.empty_activations();
        self.feed_forward(input, &mut activations);
        Ok(activations.pop().unwrap())
    }

    /// Feeds the provided `input` through the network, filling in the
    /// activated values for each layer.
    pub(crate) fn feed_forward(&self, input: &[f64], activations: &mut [Vec<f64>]) {
        activations[0].copy_from_slice(input);
        for (i, layer) in self.layers.iter().enumerate() {
            let (inputs, outputs) = mut_layers(activations, i);
            layer.forward(inputs, outputs);
        }
    }

    /// Feeds the error back through the network, filling in each layer's
    /// gradient.
    ///
    /// Seeds the output layer's error with the quadratic cost derivative
    /// `output - expected`, then visits every layer exactly once in
    /// strict reverse order; each layer deposits its gradient and
    /// propagates the error one layer upstream. `errors` must be zeroed
    /// by the caller beforehand - upstream errors accumulate.
    pub(crate) fn feed_backward(
        &self,
        activations: &[Vec<f64>],
        expected: &[f64],
        errors: &mut [Vec<f64>],
        gradients: &mut [Delta],
    ) {
        for ((e, &output), &target) in errors
            .mut_back()
            .iter_mut()
            .zip(activations.back())
            .zip(expected)
        {
            *e = output - target;
        }
        for (i, layer) in self.layers.iter().enumerate().rev() {
            let (inputs, outputs) = io_layers(activations, i);
            let (input_errors, output_errors) = mut_layers(errors, i);
            let upstream = if i == 0 { None } else { Some(input_errors) };
            layer.backward(inputs, outputs, output_errors, upstream, &mut gradients[i]);
        }
    }

    /// Applies one gradient descent step to every layer, first to last.
    pub(crate) fn apply_step(
        &mut self,
        rate: f64,
        momentum: f64,
        gradients: &mut [Delta],
        velocities: &mut [Delta],
    ) {
        for ((layer, gradient), velocity) in
            self.layers.iter_mut().zip(gradients).zip(velocities)
        {
            layer.apply_step(rate, momentum, gradient, velocity);
        }
    }

    /// Returns an activation buffer full of zeros, one vector per layer
    /// boundary (input included).
    pub(crate) fn empty_activations(&self) -> Vec<Vec<f64>> {
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(vec![0.0; self.input_len()]);
        for layer in &self.layers {
            activations.push(vec![0.0; layer.output_len()]);
        }
        activations
    }

    /// Returns a zeroed gradient or momentum buffer for each layer.
    pub(crate) fn empty_deltas(&self) -> Vec<Delta> {
        self.layers.iter().map(Dense::empty_delta).collect()
    }

    pub(crate) fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Assembles a network from prebuilt layers. The caller guarantees
    /// the sequence is non-empty and its widths chain.
    pub(crate) fn from_layers(layers: Vec<Dense>) -> Network {
        Network { layers }
    }
}

/// Gets input and output activation slices for a layer.
fn io_layers(layers: &[Vec<f64>], layer: usize) -> (&[f64], &[f64]) {
    let (before, after) = layers[layer..].split_at(1);
    (&before[0], &after[0])
}

fn mut_layers(layers: &mut [Vec<f64>], layer: usize) -> (&mut [f64], &mut [f64]) {
    let (before, after) = layers[layer..].split_at_mut(1);
    (&mut before[0], &mut after[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializer::{NormalInitializer, TableInitializer};

    fn golden_layer() -> Network {
        // weights [[0.1, 0.2], [0.3, 0.4]], biases [0.1, 0.1]; the table
        // is consumed column-major.
        let mut init = TableInitializer::new(&[0.1, 0.3, 0.2, 0.4], &[0.1]);
        Topology::input(2)
            .layer(2, Activator::Sigmoid)
            .build(&mut init)
            .unwrap()
    }

    #[test]
    fn sigmoid_layer_golden_values() {
        // z = [1, 0] * W + b = [0.2, 0.3]
        let output = golden_layer().query(&[1.0, 0.0]).unwrap();
        assert!((output[0] - 0.549833997312478).abs() < 1e-12);
        assert!((output[1] - 0.574442516811659).abs() < 1e-12);
    }

    #[test]
    fn query_is_deterministic() {
        let network = Topology::input(3)
            .layer(4, Activator::Tanh)
            .layer(2, Activator::Sigmoid)
            .build(&mut NormalInitializer::new(1.0))
            .unwrap();
        let input = [0.25, -0.75, 0.5];
        assert_eq!(
            network.query(&input).unwrap(),
            network.query(&input).unwrap()
        );
    }

    #[test]
    fn reports_layer_widths() {
        let network = Topology::input(3)
            .layer(4, Activator::ReLU)
            .layer(2, Activator::Sigmoid)
            .build(&mut NormalInitializer::new(1.0))
            .unwrap();
        assert_eq!(network.input_len(), 3);
        assert_eq!(network.output_len(), 2);
    }

    #[test]
    fn rejects_empty_topology() {
        let mut init = NormalInitializer::new(1.0);
        assert!(Topology::input(2).build(&mut init).is_err());
    }

    #[test]
    fn rejects_zero_width_layer() {
        let mut init = NormalInitializer::new(1.0);
        assert!(Topology::input(2)
            .layer(0, Activator::Sigmoid)
            .build(&mut init)
            .is_err());
        assert!(Topology::input(0)
            .layer(1, Activator::Sigmoid)
            .build(&mut init)
            .is_err());
    }

    #[test]
    fn rejects_wrong_input_width() {
        assert!(golden_layer().query(&[1.0]).is_err());
    }
}
