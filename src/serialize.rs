//! Converting trained networks to and from a persistable record format.
//!
//! The record format is an ordered list of layer records, first layer to
//! output layer, each holding its activation name, shape, row-major
//! weights, and biases. Loading reconstructs layers directly from the
//! explicit parameters without consulting an initializer, and fails on
//! any inconsistency before a network is returned.

use crate::activator::Activator;
use crate::error::{Error, Result};
use crate::feed_forward::Network;
use crate::layers::Dense;
use crate::matrix::Mat;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A single layer, flattened for persistence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerRecord {
    /// The layer's activation function, stored by name. An unrecognized
    /// name fails deserialization.
    pub activation: Activator,
    /// Number of inputs to the layer.
    pub rows: usize,
    /// Number of outputs from the layer.
    pub cols: usize,
    /// The weight matrix in row-major order, `rows * cols` entries.
    pub weights: Vec<f64>,
    /// One bias per output, `cols` entries.
    pub biases: Vec<f64>,
}

/// A whole network, flattened for persistence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub layers: Vec<LayerRecord>,
}

impl NetworkRecord {
    /// Flattens a network into records, layers in forward order.
    pub fn from_network(network: &Network) -> Self {
        let layers = network
            .layers()
            .iter()
            .map(|layer| LayerRecord {
                activation: layer.activator(),
                rows: layer.input_len(),
                cols: layer.output_len(),
                weights: layer.weights().to_row_major(),
                biases: layer.biases().into(),
            })
            .collect();
        NetworkRecord { layers }
    }

    /// Reassembles a network from records, re-establishing the layer
    /// sequence in record order.
    pub fn into_network(self) -> Result<Network> {
        if self.layers.is_empty() {
            return Err(Error::EmptyNetwork);
        }

        let mut layers = Vec::with_capacity(self.layers.len());
        let mut previous_width = None;
        for (index, record) in self.layers.into_iter().enumerate() {
            if record.rows == 0 || record.cols == 0 {
                return Err(Error::MalformedRecord {
                    index,
                    reason: format!("degenerate shape {}x{}", record.rows, record.cols),
                });
            }
            if record.weights.len() != record.rows * record.cols {
                return Err(Error::MalformedRecord {
                    index,
                    reason: format!(
                        "{}x{} layer carries {} weights",
                        record.rows,
                        record.cols,
                        record.weights.len()
                    ),
                });
            }
            if record.biases.len() != record.cols {
                return Err(Error::MalformedRecord {
                    index,
                    reason: format!(
                        "{} outputs but {} biases",
                        record.cols,
                        record.biases.len()
                    ),
                });
            }
            if let Some(width) = previous_width {
                if record.rows != width {
                    return Err(Error::MalformedRecord {
                        index,
                        reason: format!(
                            "expects {} inputs but the previous layer yields {}",
                            record.rows, width
                        ),
                    });
                }
            }
            previous_width = Some(record.cols);

            let weights = Mat::from_row_major(record.rows, record.cols, &record.weights);
            layers.push(Dense::from_parts(record.activation, weights, record.biases));
        }
        Ok(Network::from_layers(layers))
    }
}

/// Writes `network` to a JSON model file at `path`.
pub fn save<P: AsRef<Path>>(network: &Network, path: P) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer(file, &NetworkRecord::from_network(network))?;
    Ok(())
}

/// Reads a network back from a JSON model file at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
    let file = BufReader::new(File::open(path)?);
    let record: NetworkRecord = serde_json::from_reader(file)?;
    record.into_network()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed_forward::Topology;
    use crate::initializer::NormalInitializer;

    fn sample_network() -> Network {
        Topology::input(2)
            .layer(3, Activator::Tanh)
            .layer(2, Activator::Sigmoid)
            .build(&mut NormalInitializer::new(1.0))
            .unwrap()
    }

    #[test]
    fn round_trips_through_json() {
        let network = sample_network();
        let json = serde_json::to_string(&NetworkRecord::from_network(&network)).unwrap();
        let record: NetworkRecord = serde_json::from_str(&json).unwrap();
        let reloaded = record.into_network().unwrap();

        let input = [0.3, -0.9];
        assert_eq!(
            network.query(&input).unwrap(),
            reloaded.query(&input).unwrap()
        );
    }

    #[test]
    fn saves_and_loads_model_files() {
        let network = sample_network();
        let path = std::env::temp_dir().join("backprop-serialize-test.json");
        save(&network, &path).unwrap();
        let reloaded = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let input = [0.5, 0.25];
        assert_eq!(
            network.query(&input).unwrap(),
            reloaded.query(&input).unwrap()
        );
    }

    #[test]
    fn rejects_unknown_activation_names() {
        let json = r#"{"layers":[{"activation":"Gaussian","rows":1,"cols":1,"weights":[0.5],"biases":[0.0]}]}"#;
        assert!(serde_json::from_str::<NetworkRecord>(json).is_err());
    }

    #[test]
    fn rejects_empty_records() {
        let record = NetworkRecord { layers: Vec::new() };
        assert!(record.into_network().is_err());
    }

    #[test]
    fn rejects_miscounted_weights() {
        let mut record = NetworkRecord::from_network(&sample_network());
        record.layers[0].weights.pop();
        assert!(record.into_network().is_err());
    }

    #[test]
    fn rejects_broken_width_chain() {
        let record = NetworkRecord {
            layers: vec![
                LayerRecord {
                    activation: Activator::Sigmoid,
                    rows: 2,
                    cols: 2,
                    weights: vec![0.0; 4],
                    biases: vec![0.0; 2],
                },
                LayerRecord {
                    activation: Activator::Sigmoid,
                    rows: 3,
                    cols: 1,
                    weights: vec![0.0; 3],
                    biases: vec![0.0; 1],
                },
            ],
        };
        assert!(record.into_network().is_err());
    }
}
