use crate::activator::Activator;
use crate::initializer::Initializer;
use crate::matrix::Mat;
use crate::utils::ZeroOut;

use itertools::multizip;
use rblas::attribute::Transpose;
use rblas::matrix_vector::ops::{Gemv, Ger};
use rblas::Matrix;

/// A fully connected layer of a neural network.
///
/// This performs efficient network updates by storing the weights for
/// every neuron as a single matrix: entry `(i, j)` is the weight from
/// input `i` to output `j`, so each output neuron owns a column. Biases
/// are a vector with one entry per output neuron.
///
/// The layer holds parameters only. Activations, gradients, and momentum
/// state live in caller-owned buffers threaded through `forward`,
/// `backward`, and `apply_step`.
#[derive(Debug)]
pub struct Dense {
    /// The activation function to be used for every neuron in the layer.
    activator: Activator,
    /// The network weights, with each output neuron's weights stored as a
    /// column.
    weights: Mat,
    /// One bias per output neuron.
    biases: Vec<f64>,
}

/// A parameter-shaped buffer, used both for gradients and for momentum
/// accumulators.
///
/// When used as a gradient, `biases` holds the layer's node delta: the
/// bias gradient *is* the delta, since a bias feeds its neuron with a
/// fixed input of one.
#[derive(Debug)]
pub struct Delta {
    pub weights: Mat,
    pub biases: Vec<f64>,
}

impl Dense {
    /// Initializes a new, untrained layer.
    ///
    /// Arguments:
    ///
    ///  * `activator` - the activation function to be used for this layer's
    ///                  output.
    ///  * `inputs` - the number of inputs to this layer.
    ///  * `outputs` - the number of outputs from this layer.
    ///  * `initializer` - consulted once per weight and bias slot.
    pub fn new<I>(
        activator: Activator,
        inputs: usize,
        outputs: usize,
        initializer: &mut I,
    ) -> Self
    where
        I: Initializer + ?Sized,
    {
        Dense {
            activator,
            weights: Mat::from_fn(inputs, outputs, |row, col| {
                initializer.weight(row, col)
            }),
            biases: (0..outputs).map(|index| initializer.bias(index)).collect(),
        }
    }

    /// Rebuilds a layer from explicit parameters, bypassing the
    /// initializer. Used when loading a persisted model.
    pub fn from_parts(activator: Activator, weights: Mat, biases: Vec<f64>) -> Self {
        assert_eq!(weights.cols() as usize, biases.len());
        Dense {
            activator,
            weights,
            biases,
        }
    }

    pub fn activator(&self) -> Activator {
        self.activator
    }

    pub fn weights(&self) -> &Mat {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// Returns the number of inputs to this layer.
    pub fn input_len(&self) -> usize {
        self.weights.rows() as usize
    }

    /// Returns the number of outputs from this layer.
    pub fn output_len(&self) -> usize {
        self.weights.cols() as usize
    }

    /// Feeds the provided `inputs` forward through the layer:
    /// `outputs = f(inputs * W + b)`.
    ///
    /// Does not touch the parameters; repeated identical calls are
    /// deterministic.
    pub fn forward(&self, inputs: &[f64], outputs: &mut [f64]) {
        assert_eq!(inputs.len(), self.input_len());
        assert_eq!(outputs.len(), self.output_len());
        outputs.copy_from_slice(&self.biases);
        f64::gemv(
            Transpose::Trans,
            &1.0,
            &self.weights,
            inputs,
            &1.0,
            outputs,
        );
        for y in outputs {
            *y = self.activator.f(*y);
        }
    }

    /// Feeds the provided `output_errors` backwards through the layer.
    ///
    /// `inputs` and `outputs` must be the activations cached by the
    /// matching `forward` call. The node delta and the weight gradient
    /// land in `gradient`; the error with respect to this layer's inputs
    /// is accumulated into `input_errors`, which the caller hands to the
    /// previous layer. The first layer passes `None` - there is nothing
    /// further upstream to feed.
    pub fn backward(
        &self,
        inputs: &[f64],
        outputs: &[f64],
        output_errors: &[f64],
        input_errors: Option<&mut [f64]>,
        gradient: &mut Delta,
    ) {
        assert_eq!(inputs.len(), self.input_len());
        assert_eq!(outputs.len(), self.output_len());
        assert_eq!(output_errors.len(), self.output_len());
        for (y, e, d) in multizip((
            outputs.iter(),
            output_errors.iter(),
            gradient.biases.iter_mut(),
        )) {
            *d = e * self.activator.fprime(*y);
        }
        f64::ger(&1.0, inputs, &gradient.biases, &mut gradient.weights);
        if let Some(errors) = input_errors {
            assert_eq!(errors.len(), self.input_len());
            f64::gemv(
                Transpose::NoTrans,
                &1.0,
                &self.weights,
                &gradient.biases,
                &1.0,
                errors,
            );
        }
    }

    /// Applies one gradient descent step with momentum:
    /// `velocity = rate * gradient + momentum * velocity`, then the
    /// parameters step downhill by `velocity`.
    ///
    /// The weight gradient is zeroed afterwards, ready to accumulate the
    /// next example's outer product.
    pub fn apply_step(
        &mut self,
        rate: f64,
        momentum: f64,
        gradient: &mut Delta,
        velocity: &mut Delta,
    ) {
        velocity.weights.blend(rate, momentum, &gradient.weights);
        self.weights -= &velocity.weights;
        for (v, g, b) in multizip((
            velocity.biases.iter_mut(),
            gradient.biases.iter(),
            self.biases.iter_mut(),
        )) {
            *v = rate * g + momentum * *v;
            *b -= *v;
        }
        gradient.weights.zero_out();
    }

    /// Returns a zeroed gradient or momentum buffer of this layer's shape.
    pub fn empty_delta(&self) -> Delta {
        Delta {
            weights: Mat::zeros(self.input_len(), self.output_len()),
            biases: vec![0.0; self.output_len()],
        }
    }
}
