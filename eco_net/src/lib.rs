//! Binary step networks trained without gradients.
//!
//! Every hidden layer corrects itself from the bits it saw, the bits it produced and the bits it
//! was asked for, then hands a target bit vector to the layer before it.

pub mod arch;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod one_hot;
pub mod training;
pub mod weight_gen;

pub use error::{EcoErr, Result};
