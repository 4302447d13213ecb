use egui::Context;
use glam::Vec3;

use crate::model::Camera;
use crate::view::ShadowSettings;

/// Light placement controls surfaced in the settings window.
pub struct LightControls {
    pub animate: bool,
    pub manual_z: f32,
}

impl Default for LightControls {
    fn default() -> Self {
        Self {
            animate: true,
            manual_z: 0.0,
        }
    }
}

pub fn draw_debug_window(ctx: &Context, camera: &Camera, light_pos: Vec3, fps: f32) {
    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {:.0}", fps)).small());
            ui.label(
                egui::RichText::new(format!(
                    "Pos: x: {:.1} y: {:.1} z: {:.1}",
                    camera.position.x, camera.position.y, camera.position.z
                ))
                .small(),
            );
            ui.label(
                egui::RichText::new(format!(
                    "Yaw: {:.1} Pitch: {:.1} Fov: {:.0}",
                    camera.yaw(),
                    camera.pitch(),
                    camera.zoom()
                ))
                .small(),
            );
            ui.label(
                egui::RichText::new(format!(
                    "Light: x: {:.1} y: {:.1} z: {:.1}",
                    light_pos.x, light_pos.y, light_pos.z
                ))
                .small(),
            );
            ui.separator();
            ui.label(egui::RichText::new("Controls:").small());
            ui.label(egui::RichText::new("WASD - Move").small());
            ui.label(egui::RichText::new("Mouse - Look (click to grab)").small());
            ui.label(egui::RichText::new("Scroll - Zoom").small());
            ui.label(egui::RichText::new("Space - Toggle shadows").small());
            ui.label(egui::RichText::new("Ctrl - Speed boost").small());
            ui.label(egui::RichText::new("Esc - Release cursor").small());
        });
}

pub fn draw_settings_window(
    ctx: &Context,
    settings: &mut ShadowSettings,
    light: &mut LightControls,
    shadow_far: &mut f32,
    canvas_width: u32,
) {
    egui::Window::new("Settings")
        .default_pos([canvas_width as f32 - 200.0, 8.0])
        .default_size([180.0, 140.0])
        .show(ctx, |ui| {
            ui.checkbox(&mut settings.enabled, "Shadows");
            ui.label(egui::RichText::new("Bias").small());
            let _ = ui.add(egui::Slider::new(&mut settings.bias, 0.0..=0.5).step_by(0.01));
            ui.checkbox(&mut settings.lit_ambient, "Ambient in shadow");
            ui.separator();
            ui.checkbox(&mut light.animate, "Animate light");
            if !light.animate {
                ui.label(egui::RichText::new("Light z").small());
                let _ = ui.add(egui::Slider::new(&mut light.manual_z, -4.0..=4.0));
            }
            ui.label(egui::RichText::new("Shadow far plane").small());
            let _ = ui.add(egui::Slider::new(shadow_far, 5.0..=50.0).step_by(1.0));
        });
}
