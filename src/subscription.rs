pub mod oracle;
pub mod verdict;

pub use oracle::SubscriptionOracle;
pub use verdict::{ActiveRule, ResponseShape, SubscriptionVerdict};
