//! Experiments training binary step networks on MNIST.

pub mod config;
pub mod experiment;
