pub mod args;
pub mod runner;

pub use args::{get_args, Args};
pub use runner::{render, run, write_payload};
