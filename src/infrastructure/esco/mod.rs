pub mod client;
pub mod token;

pub use client::EscoClient;
pub use token::{TokenState, extract_expiry, extract_token};
