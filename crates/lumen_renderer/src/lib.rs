//! Lumen renderer - CPU path tracing of sphere scenes.
//!
//! A Monte Carlo path tracer: every pixel averages many jittered camera rays
//! that bounce through Lambertian, metal and dielectric spheres until they
//! escape to the sky or run out of depth.
//!
//! # Example
//!
//! ```ignore
//! use lumen_renderer::{render, RenderConfig, SceneDesc, BuiltinScene};
//!
//! let config = RenderConfig::default();
//! let scene = SceneDesc::builtin(BuiltinScene::Materials, config.seed);
//! let world = scene.build_world()?;
//! let camera = scene.build_camera(config.aspect_ratio())?;
//! let image = render(&camera, &world, &config)?;
//! lumen_renderer::save(&image, "out.png")?;
//! ```

mod camera;
mod config;
mod hittable;
mod material;
mod output;
mod renderer;
mod sampling;
mod scene;
mod scheduler;
mod sphere;

pub use camera::{Camera, CameraError, CameraSettings};
pub use config::{default_threads, RenderConfig, RenderError, Sampling, MAX_DEPTH, MAX_THREADS};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{schlick, Color, Dielectric, Lambertian, Material, Metal};
pub use output::{save, save_png, write_ppm, OutputError};
pub use renderer::{color_to_rgb, linear_to_gamma, ray_color, render_pixel, sky_gradient, T_MIN};
pub use sampling::{gen_f32, random_in_unit_disk, random_in_unit_sphere, worker_rng};
pub use scene::{BuiltinScene, MaterialDesc, SceneDesc, SceneError, SceneResult, SphereDesc};
pub use scheduler::{render, stripe_owner, stripe_rows, ImageBuffer};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Interval, Ray, Vec3};
