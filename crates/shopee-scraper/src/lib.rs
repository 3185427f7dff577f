pub mod client;
pub mod cookies;
pub mod error;
pub mod identity;
pub mod retry;

pub use client::{ProductFetcher, ShopeeClient};
pub use error::ScraperError;
pub use identity::Identity;
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
