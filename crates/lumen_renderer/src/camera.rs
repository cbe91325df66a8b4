//! Camera for ray generation.

use crate::sampling::random_in_unit_disk;
use crate::Ray;
use lumen_math::{unit_vector, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a camera from settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Degenerate camera basis: look_from equals look_at or vup is parallel to the view direction")]
    DegenerateBasis,

    #[error("Invalid field of view: {0} degrees (must be in (0, 180))")]
    InvalidFov(f32),

    #[error("Invalid aspect ratio: {0}")]
    InvalidAspect(f32),

    #[error("Invalid focus distance: {0}")]
    InvalidFocusDistance(f32),
}

/// Camera mapping viewport coordinates to world-space rays.
///
/// `u` runs left to right and `v` bottom to top, both over `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Axis-aligned camera at the origin looking down -Z with a 2:1 viewport.
    pub fn new() -> Self {
        Self {
            origin: Vec3::ZERO,
            lower_left_corner: Vec3::new(-2.0, -1.0, -1.0),
            horizontal: Vec3::new(4.0, 0.0, 0.0),
            vertical: Vec3::new(0.0, 2.0, 0.0),
            u: Vec3::X,
            v: Vec3::Y,
            lens_radius: 0.0,
        }
    }

    /// Camera at the origin looking down -Z with a vertical field of view in degrees.
    pub fn with_fov(vfov: f32, aspect: f32) -> Self {
        let half_height = (vfov.to_radians() / 2.0).tan();
        let half_width = aspect * half_height;
        Self {
            origin: Vec3::ZERO,
            lower_left_corner: Vec3::new(-half_width, -half_height, -1.0),
            horizontal: Vec3::new(2.0 * half_width, 0.0, 0.0),
            vertical: Vec3::new(0.0, 2.0 * half_height, 0.0),
            u: Vec3::X,
            v: Vec3::Y,
            lens_radius: 0.0,
        }
    }

    /// Generate the ray through viewport position (s, t).
    ///
    /// With a non-zero aperture the origin is jittered over the lens disk and
    /// the ray still passes through the same point on the focus plane. A
    /// pinhole camera draws no random numbers.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(self.origin + offset, target - self.origin - offset)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Positionable camera settings with depth of field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Viewport width over height
    pub aspect: f32,
    /// Lens diameter; 0 gives a pinhole camera
    pub aperture: f32,
    /// Distance to the plane of perfect focus, defaults to |look_from - look_at|
    pub focus_dist: Option<f32>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            aspect: 2.0,
            aperture: 0.0,
            focus_dist: None,
        }
    }
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: Option<f32>) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the viewport aspect ratio.
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Build the camera: orthonormal basis from the view direction and `vup`,
    /// viewport scaled out to the focus plane.
    pub fn build(&self) -> Result<Camera, CameraError> {
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(CameraError::InvalidFov(self.vfov));
        }
        if !(self.aspect > 0.0 && self.aspect.is_finite()) {
            return Err(CameraError::InvalidAspect(self.aspect));
        }

        let focus_dist = self
            .focus_dist
            .unwrap_or_else(|| (self.look_from - self.look_at).length());
        if !(focus_dist > 0.0 && focus_dist.is_finite()) {
            return Err(CameraError::InvalidFocusDistance(focus_dist));
        }

        let half_height = (self.vfov.to_radians() / 2.0).tan();
        let half_width = self.aspect * half_height;

        let w = unit_vector(self.look_from - self.look_at);
        let u = unit_vector(self.vup.cross(w));
        if w == Vec3::ZERO || u == Vec3::ZERO {
            return Err(CameraError::DegenerateBasis);
        }
        let v = w.cross(u);

        let origin = self.look_from;
        let lower_left_corner = origin
            - half_width * focus_dist * u
            - half_height * focus_dist * v
            - focus_dist * w;

        Ok(Camera {
            origin,
            lower_left_corner,
            horizontal: 2.0 * half_width * focus_dist * u,
            vertical: 2.0 * half_height * focus_dist * v,
            u,
            v,
            lens_radius: self.aperture.max(0.0) / 2.0,
        })
    }
}
