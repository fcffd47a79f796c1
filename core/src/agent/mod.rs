mod pipeline;
mod poll;

pub use poll::{Agent, PollSummary};
