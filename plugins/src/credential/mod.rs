pub mod edr;

pub use edr::EdrCredentialClient;
