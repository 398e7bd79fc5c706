// Swap status reconciliation engine
pub mod models;
pub mod classifier;
pub mod tracker;
pub mod policy;
pub mod reconciler;
pub mod aggregator;

pub use models::SwapId;
pub use policy::PollPolicy;
pub use reconciler::SwapStatusReconciler;
