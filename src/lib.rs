pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod renderer;
pub mod scene;

pub use app::App;
pub use camera::Camera;
pub use config::ViewerConfig;
pub use error::ViewerError;
