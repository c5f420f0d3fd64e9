//! Application state module

mod controller;
mod forms;
mod reset_timer;

pub use controller::*;
pub use forms::*;
