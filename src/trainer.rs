//! Training networks with stochastic gradient descent.

use crate::error::{Error, Result};
use crate::feed_forward::Network;
use crate::utils::{Back, ZeroOut};

/// A per-example training snapshot, handed to the observer callback
/// after every gradient descent step.
#[derive(Copy, Clone, Debug)]
pub struct Progress {
    /// The current epoch, counted from zero.
    pub epoch: usize,
    pub total_epochs: usize,
    /// The index of the example just trained on, counted from zero.
    pub example: usize,
    pub total_examples: usize,
    /// The running mean of the quadratic cost over the examples processed
    /// so far within the current epoch.
    pub mean_cost: f64,
}

/// Logging frequency to use during training.
#[derive(Copy, Clone, Debug)]
pub enum Logging {
    /// No logs will be printed
    Silent,
    /// A summary will be printed at completion
    Completion,
    /// A summary will be printed after every `n` epochs
    Epochs(usize),
}

impl Logging {
    /// Performs logging at the end of an epoch.
    fn epoch(&self, epoch: usize, mean_cost: f64) {
        if let &Logging::Epochs(freq) = self {
            if freq > 0 && (epoch + 1) % freq == 0 {
                println!("Epoch {}:\tcost={}", epoch + 1, mean_cost);
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, epochs: usize, mean_cost: f64) {
        if let &Logging::Silent = self {
            return;
        }
        println!("Training completed after {} epochs.", epochs);
        println!("Final cost: {}", mean_cost);
    }
}

/// The result of a training run.
#[derive(Debug)]
pub struct Trained {
    /// The trained network.
    pub network: Network,
    /// The mean quadratic cost over the final epoch's examples.
    pub mean_cost: f64,
}

/// Trains a `Network` using online stochastic gradient descent with
/// momentum: parameters update after every single example, in the order
/// the examples are given, so the learning trajectory is deterministic.
#[derive(Debug)]
pub struct Trainer {
    network: Network,
    epochs: usize,
    learning_rate: f64,
    momentum: f64,
    logging: Logging,
}

impl Trainer {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * A learning rate of 0.1.
    /// * No momentum.
    /// * 1000 training epochs.
    /// * Logs on training completion.
    pub fn new(network: Network) -> Self {
        Trainer {
            network,
            epochs: 1000,
            learning_rate: 0.1,
            momentum: 0.0,
            logging: Logging::Completion,
        }
    }

    /// Sets the number of training epochs: full passes over the examples.
    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the fraction of the previous update step blended into each
    /// new one. Zero disables momentum entirely.
    pub fn momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Trains the network using the provided labelled data.
    ///
    /// The provided `examples` should be a list of labelled data, where
    /// each element takes the form `(network input, expected output)`.
    ///
    /// Returns the trained network together with the mean cost over the
    /// final epoch, or an error if any example's shape does not match the
    /// network.
    pub fn train<I, O>(self, examples: &[(I, O)]) -> Result<Trained>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        self.train_observed(examples, |_| {})
    }

    /// Like `train`, but invokes `observer` synchronously after every
    /// example's update step with a `Progress` snapshot.
    pub fn train_observed<I, O, F>(self, examples: &[(I, O)], mut observer: F) -> Result<Trained>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
        F: FnMut(&Progress),
    {
        self.validate(examples)?;
        let Trainer {
            mut network,
            epochs,
            learning_rate,
            momentum,
            logging,
        } = self;

        let mut activations = network.empty_activations();
        let mut errors = network.empty_activations();
        let mut gradients = network.empty_deltas();
        // Momentum accumulators start at zero and persist across every
        // example and epoch of this run.
        let mut velocities = network.empty_deltas();

        let mut mean_cost = 0.0;
        for epoch in 0..epochs {
            mean_cost = 0.0;
            for (i, &(ref input, ref expected)) in examples.iter().enumerate() {
                errors.zero_out();
                network.feed_forward(input.as_ref(), &mut activations);
                network.feed_backward(
                    &activations,
                    expected.as_ref(),
                    &mut errors,
                    &mut gradients,
                );
                network.apply_step(learning_rate, momentum, &mut gradients, &mut velocities);

                let cost = quadratic_cost(activations.back(), expected.as_ref());
                mean_cost += (cost - mean_cost) / (i as f64 + 1.0);
                observer(&Progress {
                    epoch,
                    total_epochs: epochs,
                    example: i,
                    total_examples: examples.len(),
                    mean_cost,
                });
            }
            logging.epoch(epoch, mean_cost);
        }
        logging.completion(epochs, mean_cost);
        Ok(Trained { network, mean_cost })
    }

    /// Verifies that every example's shape matches the network, returning
    /// an error before any training step otherwise.
    fn validate<I, O>(&self, examples: &[(I, O)]) -> Result<()>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        for &(ref input, ref expected) in examples {
            if input.as_ref().len() != self.network.input_len() {
                return Err(Error::ShapeMismatch {
                    what: "training input",
                    expected: self.network.input_len(),
                    actual: input.as_ref().len(),
                });
            }
            if expected.as_ref().len() != self.network.output_len() {
                return Err(Error::ShapeMismatch {
                    what: "training target",
                    expected: self.network.output_len(),
                    actual: expected.as_ref().len(),
                });
            }
        }
        Ok(())
    }
}

/// Computes the quadratic cost `0.5 * sum((expected - actual)^2)`.
fn quadratic_cost(actual: &[f64], expected: &[f64]) -> f64 {
    assert_eq!(actual.len(), expected.len());
    let mut cost = 0.0;
    for (&a, e) in actual.iter().zip(expected) {
        cost += (e - a) * (e - a);
    }
    0.5 * cost
}
