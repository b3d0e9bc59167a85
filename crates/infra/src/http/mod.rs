//! HTTP plumbing shared by the remote adapters

mod client;

pub use client::{HttpClient, HttpClientBuilder};
