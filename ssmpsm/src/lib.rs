pub mod app;
pub mod cli;
pub mod client;
pub mod configs;
pub mod domain;
pub mod error;
pub mod output;
pub mod storage;

pub use client::ParameterClient;
pub use error::ParameterError;
