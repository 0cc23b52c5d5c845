//! Network executors.

pub mod http;

pub use http::HttpRequestTool;
