pub mod activations;
mod config;
pub mod layers;
mod network;

pub use config::NetworkConfig;
pub use network::Network;
