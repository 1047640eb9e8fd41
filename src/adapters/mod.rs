// Adapters layer: concrete holiday sources for each tier of the fallback chain.

pub mod http;
pub mod seed;
pub mod storage;

pub use http::LiveSource;
pub use seed::SeedSource;
pub use storage::LocalCache;
