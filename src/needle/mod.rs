pub mod client;
pub mod rate_limit;
pub mod types;

pub use client::NeedleClient;
pub use rate_limit::RateLimiter;
pub use types::{Collection, CollectionFile, FileToAdd};
