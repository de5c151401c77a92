pub mod clock;
pub mod controller;
pub mod gpu_context;
pub mod input_adapter;
pub mod movement;
pub mod viewport;

pub use clock::{Clock, FpsCounter};
pub use controller::{Button, Controller};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use movement::MovementState;
pub use viewport::ViewportSize;
