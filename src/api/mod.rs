pub mod client;

pub use client::{handle_response, ApiClient};
pub use reqwest::Method;
