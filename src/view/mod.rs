//! View modes and the controller that switches between them.

mod controller;
mod mode;

pub use controller::ViewModeController;
pub use mode::{ActiveSurface, ViewMode};
