pub mod feed_api;
pub mod logger;
pub mod version;
