// Re-export all public modules so they can be used from main.rs
pub mod logging;
pub mod utils;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;
