//! Scanline-striped multi-threaded rendering.
//!
//! Rows are dealt out to workers round-robin: worker `t` owns every row `j`
//! (counted from the bottom) with `j % workers == t`. Each worker gets
//! exclusive `&mut` slices of its rows up front, so the writes need no
//! locking and the borrow checker proves the partition is disjoint.

use std::thread;
use std::time::Instant;

use crate::renderer::{color_to_rgb, render_pixel};
use crate::sampling::worker_rng;
use crate::{Camera, Hittable, RenderConfig, RenderError};

/// 8-bit RGB image, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Number of interleaved channels per pixel.
    pub const CHANNELS: usize = 3;

    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * Self::CHANNELS],
        }
    }

    /// Get the pixel at (x, y), with y counted from the top.
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Raw interleaved samples.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn row_len(&self) -> usize {
        self.width as usize * Self::CHANNELS
    }
}

/// Worker that owns row `row` when the image is split into `stripes` stripes.
#[inline]
pub fn stripe_owner(row: u32, stripes: usize) -> usize {
    row as usize % stripes
}

/// Rows (counted from the bottom) owned by `worker` out of `stripes`.
pub fn stripe_rows(height: u32, stripes: usize, worker: usize) -> impl Iterator<Item = u32> {
    (worker as u32..height).step_by(stripes)
}

/// Render the entire scene to an image buffer.
///
/// Spawns `config.worker_count()` scoped workers, each with its own
/// generator seeded from `(config.seed, worker)`, and returns once all of
/// them have joined. Identical configs produce identical buffers.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> Result<ImageBuffer, RenderError> {
    config.validate()?;

    let workers = config.worker_count();
    let mut image = ImageBuffer::new(config.width, config.height);
    let row_len = image.row_len();
    let height = config.height;

    log::info!(
        "Rendering {}x{} @ {} spp, depth {}, {} workers",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        workers
    );
    let start = Instant::now();

    // Buffer row r (from the top) holds computed row j = height - 1 - r
    let mut assignments: Vec<Vec<(u32, &mut [u8])>> = (0..workers).map(|_| Vec::new()).collect();
    for (row_from_top, row) in image.data.chunks_exact_mut(row_len).enumerate() {
        let j = height - 1 - row_from_top as u32;
        assignments[stripe_owner(j, workers)].push((j, row));
    }

    thread::scope(|scope| {
        let handles: Vec<_> = assignments
            .into_iter()
            .enumerate()
            .map(|(worker, rows)| scope.spawn(move || render_rows(worker, rows, camera, world, config)))
            .collect();

        let mut result = Ok(());
        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() && result.is_ok() {
                log::error!("Render worker {} panicked", worker);
                result = Err(RenderError::WorkerPanicked(worker));
            }
        }
        result
    })?;

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}

fn render_rows(
    worker: usize,
    rows: Vec<(u32, &mut [u8])>,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) {
    let mut rng = worker_rng(config.seed, worker as u64);
    let row_count = rows.len();

    for (j, row) in rows {
        for (i, pixel) in row.chunks_exact_mut(ImageBuffer::CHANNELS).enumerate() {
            let color = render_pixel(camera, world, i as u32, j, config, &mut rng);
            pixel.copy_from_slice(&color_to_rgb(color));
        }
    }

    log::debug!("Worker {} finished {} rows", worker, row_count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HitRecord, HittableList, Interval, Ray, Sampling};
    use std::collections::HashSet;

    fn small_config(threads: usize) -> RenderConfig {
        RenderConfig {
            width: 8,
            height: 6,
            samples_per_pixel: 1,
            max_depth: 50,
            threads,
            seed: 0,
            sampling: Sampling::PixelCenter,
        }
    }

    #[test]
    fn test_eight_stripes_are_disjoint_and_cover() {
        let height = 37;
        let rows_of = |t: usize| -> HashSet<u32> {
            (0..height).filter(|&j| stripe_owner(j, 8) == t).collect()
        };

        for t1 in 0..8 {
            for t2 in 0..8 {
                if t1 != t2 {
                    assert!(rows_of(t1).is_disjoint(&rows_of(t2)));
                }
            }
        }
        let union: HashSet<u32> = (0..8).flat_map(rows_of).collect();
        assert_eq!(union.len(), height as usize);
    }

    #[test]
    fn test_stripe_rows_match_owner() {
        for workers in [1, 3, 8] {
            for worker in 0..workers {
                let rows: Vec<u32> = stripe_rows(37, workers, worker).collect();
                assert!(rows.iter().all(|&j| stripe_owner(j, workers) == worker));
                assert_eq!(rows.len(), (0..37).filter(|&j| stripe_owner(j, workers) == worker).count());
            }
        }
        assert_eq!(stripe_rows(10, 8, 1).collect::<Vec<_>>(), vec![1, 9]);
    }

    #[test]
    fn test_stripes_cover_for_any_worker_count() {
        for workers in 1..=16 {
            let mut counts = vec![0; workers];
            for j in 0..100 {
                counts[stripe_owner(j, workers)] += 1;
            }
            assert_eq!(counts.iter().sum::<u32>(), 100);
            // Round-robin keeps the load within one row
            let max = *counts.iter().max().unwrap();
            let min = *counts.iter().min().unwrap();
            assert!(max - min <= 1);
        }
    }

    #[test]
    fn test_empty_scene_renders_sky_top_down() {
        let world = HittableList::new();
        let camera = Camera::new();

        for threads in [1, 3, 8] {
            let image = render(&camera, &world, &small_config(threads)).unwrap();
            assert_eq!(image.as_bytes().len(), 8 * 6 * 3);

            // Sky is bluer at the top: red falls off towards the top row
            let top = image.get(4, 0);
            let bottom = image.get(4, 5);
            assert!(top[0] < bottom[0]);
            assert_eq!(top[2], 255);
            assert_eq!(bottom[2], 255);
        }
    }

    #[test]
    fn test_thread_count_does_not_leave_rows_black() {
        let world = HittableList::new();
        let camera = Camera::new();

        let image = render(&camera, &world, &small_config(5)).unwrap();
        for y in 0..6 {
            for x in 0..8 {
                assert_ne!(image.get(x, y), [0, 0, 0], "pixel ({}, {}) never written", x, y);
            }
        }
    }

    #[test]
    fn test_render_rejects_invalid_config() {
        let world = HittableList::new();
        let camera = Camera::new();
        let config = RenderConfig {
            samples_per_pixel: 0,
            ..small_config(2)
        };

        assert_eq!(
            render(&camera, &world, &config),
            Err(RenderError::InvalidSamples)
        );
    }

    struct ExplodingWorld;

    impl Hittable for ExplodingWorld {
        fn hit(&self, _ray: &Ray, _ray_t: Interval) -> Option<HitRecord<'_>> {
            panic!("intersection failed");
        }
    }

    #[test]
    fn test_panicking_worker_is_reported() {
        let camera = Camera::new();
        let config = RenderConfig {
            width: 4,
            height: 4,
            ..small_config(2)
        };

        // Every worker panics; the first one joined is reported
        let result = render(&camera, &ExplodingWorld, &config);
        assert_eq!(result, Err(RenderError::WorkerPanicked(0)));
    }
}
