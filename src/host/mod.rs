//! Interactive host loop.
//!
//! Owns the window surface and the mutable parameter record, and pushes the
//! current parameters into the shader on every display refresh.

mod app;
pub mod state;

pub use app::{run, HostConfig, HostError, SnowflakeApp};
pub use state::{control_for_key, Control, ParameterState};
