// Command input library
// Device polling, command bindings and edge detection

pub mod config;
pub mod input;

pub use config::InputConfig;
pub use input::{CommandId, InputError, InputSystem};
