pub mod clear;
pub mod completions;
pub mod env;

pub use clear::ClearCommand;
pub use completions::CompletionsCommand;
pub use env::EnvCommand;
