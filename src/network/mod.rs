pub mod client;
pub mod error;
pub mod interceptors;
pub mod poller;
pub mod worker;

#[cfg(test)]
mod test_support;

pub use client::ApiClient;
pub use error::ApiError;
pub use worker::ApiWorker;
