pub mod advanced;
pub mod aggregate;
pub mod config;
pub mod fake_feed;
pub mod feed;
pub mod feed_fetch;
pub mod http_client;
pub mod logging;
pub mod normalize;
pub mod state;
pub mod table;
pub mod watchlist;
