pub mod access;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod resources;
pub mod session;

pub use error::{ConsoleError, Result};
