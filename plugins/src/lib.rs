pub mod credential;
pub mod factory;
pub mod http;
pub mod portal;
pub mod runner;
