pub mod cli;
pub mod decode;
pub mod run;
