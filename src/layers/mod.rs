mod dense;

pub use self::dense::{Delta, Dense};
