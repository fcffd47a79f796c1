pub mod ansible;
pub mod replay;

pub use ansible::AnsibleRunnerPlugin;
pub use replay::ReplayRunnerPlugin;
