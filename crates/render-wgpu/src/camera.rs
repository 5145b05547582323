use glam::Mat4;
use tilehop_common::CameraConfig;
use tilehop_kernel::CameraView;

/// Perspective projection. The view comes from the kernel every frame; only
/// the aspect ratio changes at runtime, on window resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut projection = Self {
            fov: config.fov_degrees.to_radians(),
            aspect: 1.0,
            near: config.near,
            far: config.far,
        };
        projection.resize(width, height);
        projection
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self, view: &CameraView) -> Mat4 {
        self.matrix() * view_matrix(view)
    }
}

pub fn view_matrix(view: &CameraView) -> Mat4 {
    Mat4::look_at_rh(view.eye, view.target, view.up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn follow_view() -> CameraView {
        CameraView {
            eye: Vec3::new(0.0, 3.0, 22.0),
            target: Vec3::new(0.0, 0.0, 19.0),
            up: Vec3::Y,
        }
    }

    #[test]
    fn default_projection_is_square_ninety_degrees() {
        let p = Projection::new(&CameraConfig::default(), 600, 600);
        assert_eq!(p.aspect, 1.0);
        assert!((p.fov - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(p.near, 0.1);
        assert_eq!(p.far, 500.0);
    }

    #[test]
    fn resize_changes_aspect_only() {
        let mut p = Projection::new(&CameraConfig::default(), 600, 600);
        let fov = p.fov;
        p.resize(1200, 600);
        assert_eq!(p.aspect, 2.0);
        assert_eq!(p.fov, fov);
        p.resize(0, 0);
        assert_eq!(p.aspect, 1.0);
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let p = Projection::new(&CameraConfig::default(), 600, 600);
        let vp = p.view_projection(&follow_view());
        let ndc = vp.project_point3(Vec3::new(0.0, 0.0, 19.0));
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!((0.0..1.0).contains(&ndc.z));
    }

    #[test]
    fn top_view_up_vector_is_usable() {
        let view = CameraView {
            eye: Vec3::new(10.0, 15.0, 10.0),
            target: Vec3::new(0.0, 0.0, 19.0),
            up: Vec3::NEG_Z,
        };
        let m = view_matrix(&view);
        assert!(m.is_finite());
    }
}
