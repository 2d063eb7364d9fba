pub mod automobile;
pub mod timestamp;

pub use automobile::{Automobile, SEED_ID};
