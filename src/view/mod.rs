// VIEW: Rendering and graphics
pub mod gpu_init;
pub mod render;
pub mod shadow;
pub mod texture;

pub use gpu_init::GpuContext;
pub use render::{CameraResources, CameraUniform, LightUniform, MaterialResources};
pub use shadow::{ShadowPipeline, ShadowSettings};
