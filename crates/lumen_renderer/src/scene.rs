//! Scene descriptions: JSON scene files and built-in scenes.
//!
//! A [`SceneDesc`] is plain data. It is validated and turned into a
//! [`HittableList`] and a [`Camera`] right before rendering; the resulting
//! world is never modified afterwards.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use lumen_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{CameraError, CameraSettings};
use crate::{Camera, Color, Dielectric, HittableList, Lambertian, Material, Metal, Sphere};

/// Errors that can occur while loading or building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown built-in scene '{0}' (expected one of: two-spheres, materials, random)")]
    UnknownBuiltin(String),

    #[error("Invalid sphere #{index}: {reason}")]
    InvalidSphere { index: usize, reason: String },

    #[error("Invalid camera: {0}")]
    Camera(#[from] CameraError),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Material as written in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaterialDesc {
    Lambertian {
        albedo: Color,
    },
    Metal {
        albedo: Color,
        #[serde(default)]
        fuzz: f32,
    },
    Dielectric {
        ior: f32,
    },
}

impl From<&MaterialDesc> for Material {
    fn from(desc: &MaterialDesc) -> Self {
        match *desc {
            MaterialDesc::Lambertian { albedo } => Lambertian::new(albedo).into(),
            MaterialDesc::Metal { albedo, fuzz } => Metal::new(albedo, fuzz).into(),
            MaterialDesc::Dielectric { ior } => Dielectric::new(ior).into(),
        }
    }
}

/// Sphere as written in a scene file. A negative radius flips the normal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: Vec3,
    pub radius: f32,
    pub material: MaterialDesc,
}

impl SphereDesc {
    pub fn new(center: Vec3, radius: f32, material: MaterialDesc) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    fn validate(&self, index: usize) -> SceneResult<()> {
        let invalid = |reason: &str| SceneError::InvalidSphere {
            index,
            reason: reason.to_string(),
        };

        if !self.center.is_finite() {
            return Err(invalid("center is not finite"));
        }
        if self.radius == 0.0 || !self.radius.is_finite() {
            return Err(invalid("radius must be finite and non-zero"));
        }
        match self.material {
            MaterialDesc::Lambertian { albedo } | MaterialDesc::Metal { albedo, .. }
                if !albedo.is_finite() || albedo.min_element() < 0.0 =>
            {
                Err(invalid("albedo must be finite and non-negative"))
            }
            MaterialDesc::Dielectric { ior } if !(ior > 0.0 && ior.is_finite()) => {
                Err(invalid("index of refraction must be positive"))
            }
            _ => Ok(()),
        }
    }
}

/// Built-in scenes selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinScene {
    /// Diffuse ground and a gold mirror sphere
    TwoSpheres,
    /// Diffuse, metal and hollow glass spheres seen through a defocused lens
    Materials,
    /// A field of random small spheres around three large ones
    Random,
}

impl BuiltinScene {
    pub const ALL: [BuiltinScene; 3] = [BuiltinScene::TwoSpheres, BuiltinScene::Materials, BuiltinScene::Random];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinScene::TwoSpheres => "two-spheres",
            BuiltinScene::Materials => "materials",
            BuiltinScene::Random => "random",
        }
    }
}

impl FromStr for BuiltinScene {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinScene::ALL
            .into_iter()
            .find(|scene| scene.name() == s)
            .ok_or_else(|| SceneError::UnknownBuiltin(s.to_string()))
    }
}

/// Definition of a scene to be rendered: camera plus spheres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDesc {
    #[serde(default)]
    pub camera: CameraSettings,
    pub objects: Vec<SphereDesc>,
}

impl SceneDesc {
    /// Parse a scene from JSON text.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let path = path.as_ref();
        log::info!("Loading scene from {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialize the scene as pretty-printed JSON.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build one of the built-in scenes. `seed` only affects [`BuiltinScene::Random`].
    pub fn builtin(scene: BuiltinScene, seed: u64) -> Self {
        match scene {
            BuiltinScene::TwoSpheres => two_spheres(),
            BuiltinScene::Materials => materials(),
            BuiltinScene::Random => random_spheres(seed),
        }
    }

    /// Validate every sphere and build the world.
    pub fn build_world(&self) -> SceneResult<HittableList> {
        for (index, sphere) in self.objects.iter().enumerate() {
            sphere.validate(index)?;
        }

        let world: HittableList = self
            .objects
            .iter()
            .map(|s| Sphere::new(s.center, s.radius, Material::from(&s.material)))
            .collect();
        log::debug!("Built world with {} spheres", world.len());
        Ok(world)
    }

    /// Build the camera for an image with the given aspect ratio.
    pub fn build_camera(&self, aspect: f32) -> SceneResult<Camera> {
        Ok(self.camera.clone().with_aspect(aspect).build()?)
    }
}

fn two_spheres() -> SceneDesc {
    SceneDesc {
        camera: CameraSettings::default(),
        objects: vec![
            SphereDesc::new(
                Vec3::new(0.0, -100.5, -1.0),
                100.0,
                MaterialDesc::Lambertian {
                    albedo: Color::new(0.5, 0.5, 0.5),
                },
            ),
            SphereDesc::new(
                Vec3::new(0.0, 0.0, -1.0),
                0.5,
                MaterialDesc::Metal {
                    albedo: Color::new(0.8, 0.6, 0.2),
                    fuzz: 0.0,
                },
            ),
        ],
    }
}

fn materials() -> SceneDesc {
    let glass = MaterialDesc::Dielectric { ior: 1.5 };
    SceneDesc {
        camera: CameraSettings::default()
            .with_position(Vec3::new(3.0, 3.0, 2.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(20.0, 2.0, None),
        objects: vec![
            SphereDesc::new(
                Vec3::new(0.0, -100.5, -1.0),
                100.0,
                MaterialDesc::Lambertian {
                    albedo: Color::new(0.8, 0.8, 0.0),
                },
            ),
            SphereDesc::new(
                Vec3::new(0.0, 0.0, -1.0),
                0.5,
                MaterialDesc::Lambertian {
                    albedo: Color::new(0.1, 0.2, 0.5),
                },
            ),
            SphereDesc::new(
                Vec3::new(1.0, 0.0, -1.0),
                0.5,
                MaterialDesc::Metal {
                    albedo: Color::new(0.8, 0.6, 0.2),
                    fuzz: 0.3,
                },
            ),
            // Hollow glass: the inner sphere's negative radius flips its normal
            SphereDesc::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass.clone()),
            SphereDesc::new(Vec3::new(-1.0, 0.0, -1.0), -0.45, glass),
        ],
    }
}

/// Mixed into the render seed so scene layout and worker 0 draw from different streams.
const SCENE_SEED_SALT: u64 = 0x5CE4E;

fn scene_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ SCENE_SEED_SALT)
}

fn random_spheres(seed: u64) -> SceneDesc {
    let mut rng = scene_rng(seed);
    let mut objects = vec![SphereDesc::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        MaterialDesc::Lambertian {
            albedo: Color::splat(0.5),
        },
    )];

    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let material = if choose_mat < 0.8 {
                MaterialDesc::Lambertian {
                    albedo: Color::new(
                        rng.gen::<f32>() * rng.gen::<f32>(),
                        rng.gen::<f32>() * rng.gen::<f32>(),
                        rng.gen::<f32>() * rng.gen::<f32>(),
                    ),
                }
            } else if choose_mat < 0.95 {
                MaterialDesc::Metal {
                    albedo: Color::new(
                        0.5 * (1.0 + rng.gen::<f32>()),
                        0.5 * (1.0 + rng.gen::<f32>()),
                        0.5 * (1.0 + rng.gen::<f32>()),
                    ),
                    fuzz: 0.5 * rng.gen::<f32>(),
                }
            } else {
                MaterialDesc::Dielectric { ior: 1.5 }
            };
            objects.push(SphereDesc::new(center, 0.2, material));
        }
    }

    objects.push(SphereDesc::new(Vec3::new(0.0, 1.0, 0.0), 1.0, MaterialDesc::Dielectric { ior: 1.5 }));
    objects.push(SphereDesc::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        MaterialDesc::Lambertian {
            albedo: Color::new(0.4, 0.2, 0.1),
        },
    ));
    objects.push(SphereDesc::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        MaterialDesc::Metal {
            albedo: Color::new(0.7, 0.6, 0.5),
            fuzz: 0.0,
        },
    ));

    SceneDesc {
        camera: CameraSettings::default()
            .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.1, Some(10.0)),
        objects,
    }
}
