mod commands;
mod history;

pub use commands::{Command, Submission};
pub use history::{DEFAULT_CAPACITY, History};
