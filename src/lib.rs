#[macro_use]
extern crate serde_derive;

pub mod activator;
pub mod error;
pub mod feed_forward;
pub mod initializer;
pub mod serialize;
pub mod trainer;

mod layers;
mod matrix;
mod utils;
