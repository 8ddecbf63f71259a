use crate::error::Result;

pub mod client;
pub mod request;

pub use client::ApiClient;

pub type FetchResult<T> = Result<T>;
