// MODEL: Simulation state and data
pub mod camera;
pub mod scene;

pub use camera::{Camera, MoveDirection};
pub use scene::{ModelUniform, Scene};
