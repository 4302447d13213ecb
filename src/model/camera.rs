use glam::{Mat4, Vec3};

/// Movement directions, decoupled from any concrete key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_ZOOM: f32 = 45.0;

const PITCH_LIMIT: f32 = 89.0;
const ZOOM_MIN: f32 = 1.0;
const ZOOM_MAX: f32 = 45.0;

/// Free-flight camera: position plus yaw/pitch Euler angles in degrees.
///
/// front/right/up are derived from yaw/pitch and stay a right-handed
/// orthonormal basis; they are only written by `update_vectors`.
pub struct Camera {
    pub position: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    pub speed: f32,
    pub sensitivity: f32,
    zoom: f32,
}

impl Camera {
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            world_up: world_up.normalize(),
            yaw,
            pitch,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    pub fn yaw(&self) -> f32 { self.yaw }
    pub fn pitch(&self) -> f32 { self.pitch }
    pub fn front(&self) -> Vec3 { self.front }
    pub fn right(&self) -> Vec3 { self.right }
    pub fn up(&self) -> Vec3 { self.up }

    /// Vertical field of view in degrees for the projection matrix.
    pub fn zoom(&self) -> f32 { self.zoom }

    /// Displace the camera along its front/right axes.
    /// No bounds checking; the caller owns world constraints.
    pub fn advance(&mut self, direction: MoveDirection, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            MoveDirection::Forward => self.position += self.front * velocity,
            MoveDirection::Backward => self.position -= self.front * velocity,
            MoveDirection::Left => self.position -= self.right * velocity,
            MoveDirection::Right => self.position += self.right * velocity,
        }
    }

    /// Apply a look offset (already in screen-delta units). Offsets are
    /// scaled by sensitivity and accumulated into yaw/pitch.
    pub fn look(&mut self, xoffset: f32, yoffset: f32, constrain_pitch: bool) {
        self.yaw += xoffset * self.sensitivity;
        self.pitch += yoffset * self.sensitivity;

        // Keep the screen from flipping when pitch approaches the poles
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Scroll input narrows/widens the field of view.
    pub fn zoom_by(&mut self, yoffset: f32) {
        self.zoom = (self.zoom - yoffset).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// View matrix looking from `position` along `front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    // Order matters: front from the angles first, then right against
    // world_up, then up from the two. Swapping right/front corrupts the
    // basis near the poles.
    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = Camera::default();
        assert_vec3_near(camera.front(), Vec3::NEG_Z);
        assert_vec3_near(camera.right(), Vec3::X);
        assert_vec3_near(camera.up(), Vec3::Y);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = Camera::default();
        camera.sensitivity = 1.0;
        camera.look(0.0, 10_000.0, true);
        assert!(camera.pitch() <= 89.0);
        camera.look(0.0, -100_000.0, true);
        assert!(camera.pitch() >= -89.0);
    }

    #[test]
    fn test_pitch_unconstrained_when_asked() {
        let mut camera = Camera::default();
        camera.sensitivity = 1.0;
        camera.look(0.0, 120.0, false);
        assert!(camera.pitch() > 89.0);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = Camera::default();
        camera.zoom_by(100.0);
        assert_eq!(camera.zoom(), 1.0);
        camera.zoom_by(-500.0);
        assert_eq!(camera.zoom(), 45.0);
        camera.zoom_by(5.0);
        assert_eq!(camera.zoom(), 40.0);
    }

    #[test]
    fn test_basis_orthonormal_for_many_orientations() {
        for yaw_step in 0..24 {
            for pitch_step in -8..=8 {
                let mut c = Camera::new(
                    Vec3::ZERO,
                    Vec3::Y,
                    yaw_step as f32 * 15.0,
                    pitch_step as f32 * 11.0,
                );
                c.look(3.0, -7.0, true);
                let (f, r, u) = (c.front(), c.right(), c.up());
                assert!((f.length() - 1.0).abs() < EPS);
                assert!((r.length() - 1.0).abs() < EPS);
                assert!((u.length() - 1.0).abs() < EPS);
                assert!(f.dot(r).abs() < EPS);
                assert!(f.dot(u).abs() < EPS);
                assert!(r.dot(u).abs() < EPS);
                // Right-handed basis
                assert_vec3_near(r.cross(f), u);
            }
        }
    }

    #[test]
    fn test_view_matrix_maps_position_to_origin() {
        let camera = Camera::new(Vec3::new(3.0, -2.0, 7.5), Vec3::Y, 37.0, -12.0);
        let view = camera.view_matrix();
        let mapped = view.transform_point3(camera.position);
        assert!(mapped.length() < 1e-4, "{mapped:?}");
    }

    #[test]
    fn test_advance_moves_along_basis() {
        let mut camera = Camera::default();
        camera.speed = 2.0;
        camera.advance(MoveDirection::Forward, 0.5);
        assert_vec3_near(camera.position, Vec3::new(0.0, 0.0, -1.0));
        camera.advance(MoveDirection::Right, 0.5);
        assert_vec3_near(camera.position, Vec3::new(1.0, 0.0, -1.0));
        camera.advance(MoveDirection::Backward, 0.5);
        camera.advance(MoveDirection::Left, 0.5);
        assert_vec3_near(camera.position, Vec3::ZERO);
    }

    #[test]
    fn test_look_turns_yaw_by_sensitivity_scaled_offset() {
        // Camera at (0,0,3) looking down -Z; a 90 degree turn ends up on +X
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Y, -90.0, 0.0);
        camera.sensitivity = 1.0;
        assert_vec3_near(camera.front(), Vec3::NEG_Z);

        camera.look(90.0, 0.0, true);
        assert!((camera.yaw() - 0.0).abs() < 1e-4);
        assert_vec3_near(camera.front(), Vec3::X);
    }
}
