pub mod user;

pub use user::{Role, TokenPair, UserProfile};
