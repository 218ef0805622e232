extern crate backprop;
extern crate rand;

use backprop::activator::Activator;
use backprop::feed_forward::{Network, Topology};
use backprop::initializer::NormalInitializer;
use backprop::serialize;
use backprop::trainer::{Logging, Trainer};

type Input = [f64; 2];
type Output = [f64; 2];

/// Samples noisy points in the plane, labelled by whether they fall
/// inside the unit circle.
fn generate_data(num_samples: usize) -> Vec<(Input, Output)> {
    use rand::distributions::IndependentSample;
    let mut rng = rand::thread_rng();
    let radius = rand::distributions::Range::new(0.0, 1.4);
    let angle = rand::distributions::Range::new(0.0, 2.0 * std::f64::consts::PI);

    let mut data = Vec::new();
    for _ in 0..num_samples {
        let r = radius.ind_sample(&mut rng);
        let theta = angle.ind_sample(&mut rng);
        let point = [r * theta.cos(), r * theta.sin()];
        let class = if r < 1.0 { [1.0, 0.0] } else { [0.0, 1.0] };
        data.push((point, class));
    }
    data
}

fn score(set_name: &str, network: &Network, test_data: &[(Input, Output)]) {
    let mut num_correct = 0;
    for &(input, expected) in test_data {
        let output = network.query(&input).unwrap();
        let class = if output[0] > output[1] { 0 } else { 1 };
        if expected[class] == 1.0 {
            num_correct += 1;
        }
    }
    println!(
        "{} set results: {} of {} correct",
        set_name,
        num_correct,
        test_data.len()
    );
}

fn main() {
    let training_data = generate_data(5_000);

    let network = Topology::input(2)
        .layer(8, Activator::Sigmoid)
        .layer(2, Activator::Sigmoid)
        .build(&mut NormalInitializer::new(1.0))
        .unwrap();
    let trained = Trainer::new(network)
        .learning_rate(0.3)
        .momentum(0.9)
        .epochs(100)
        .logging(Logging::Epochs(10))
        .train(&training_data)
        .unwrap();

    println!();
    score("Training", &trained.network, &training_data);
    score("Test", &trained.network, &generate_data(1_000));

    let path = std::env::temp_dir().join("circle-model.json");
    serialize::save(&trained.network, &path).unwrap();
    let reloaded = serialize::load(&path).unwrap();
    score("Reloaded test", &reloaded, &generate_data(1_000));
}
