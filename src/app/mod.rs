pub mod bootstrap;
pub mod command;
pub mod controller;

pub use bootstrap::run;
pub use command::ShellCommand;
pub use controller::{AppController, CommandOutcome};
