//! Task pipeline of the fleetrun agent: decode portal tasks, prepare
//! ansible jobs, fold the runner's event stream into per-host outcomes and
//! report back.

pub mod agent;
pub mod api;
pub mod config;
pub mod context;
pub mod credential;
pub mod error;
pub mod job;
pub mod portal;
pub mod report;
pub mod runner;
pub mod task;
