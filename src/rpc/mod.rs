pub mod traits;
pub mod client;
pub mod models;
pub mod registry;

pub use client::MmProxy;
pub use registry::NodeRegistry;

#[cfg(test)]
pub mod mock;
