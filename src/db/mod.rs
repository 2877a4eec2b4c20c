pub mod client;

pub use client::{DataStore, DataStoreError, RestClient};
