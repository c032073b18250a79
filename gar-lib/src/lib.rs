pub mod config;
pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod logging;
pub mod release;
pub mod retrieve;

#[cfg(test)]
pub mod test_helpers;
