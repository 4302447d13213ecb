// CONTROLLER: Input handling and per-frame update logic
pub mod camera_controller;
pub mod input;

pub use camera_controller::CameraController;
pub use input::InputState;
