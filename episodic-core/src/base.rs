//! Core functionalities.
mod agent;
mod env;
mod step;
pub use agent::{Agent, SharedAgent};
pub use env::Env;
pub use step::{Step, Transition};
