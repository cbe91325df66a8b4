//! Render configuration and validation.

use thiserror::Error;

/// Hard upper bound on the number of bounces a path may take.
pub const MAX_DEPTH: u32 = 50;

/// Upper bound on render workers; one OS thread is spawned per worker.
pub const MAX_THREADS: usize = 1024;

/// Errors that stop a render before or while it runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Invalid image size {width}x{height}: both dimensions must be positive")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Samples per pixel must be at least 1")]
    InvalidSamples,

    #[error("Invalid max depth {0}: must be between 1 and 50")]
    InvalidDepth(u32),

    #[error("Invalid thread count {0}: must be between 1 and 1024")]
    InvalidThreads(usize),

    #[error("Render worker {0} panicked")]
    WorkerPanicked(usize),
}

/// Where inside a pixel the camera samples are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sampling {
    /// Uniform random subpixel offset per sample (anti-aliasing)
    #[default]
    Jittered,
    /// Every sample goes through the pixel centre
    PixelCenter,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth, at most [`MAX_DEPTH`]
    pub max_depth: u32,
    /// Number of render workers
    pub threads: usize,
    /// Base seed; worker `t` samples from a stream derived from `(seed, t)`
    pub seed: u64,
    pub sampling: Sampling,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 100,
            samples_per_pixel: 100,
            max_depth: MAX_DEPTH,
            threads: default_threads(),
            seed: 0,
            sampling: Sampling::Jittered,
        }
    }
}

impl RenderConfig {
    /// Check every parameter before any work is spawned.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSamples);
        }
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH {
            return Err(RenderError::InvalidDepth(self.max_depth));
        }
        if self.threads == 0 || self.threads > MAX_THREADS {
            return Err(RenderError::InvalidThreads(self.threads));
        }
        Ok(())
    }

    /// Image width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Workers actually spawned; never more than there are rows.
    pub fn worker_count(&self) -> usize {
        self.threads.min(self.height as usize).max(1)
    }
}

/// Detected hardware parallelism capped at [`MAX_THREADS`], or 1 when it
/// cannot be queried.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().min(MAX_THREADS))
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RenderConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.max_depth, 50);
        assert!(config.threads >= 1);
        assert_eq!(config.aspect_ratio(), 2.0);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let base = RenderConfig::default();

        let config = RenderConfig { width: 0, ..base.clone() };
        assert_eq!(
            config.validate(),
            Err(RenderError::InvalidDimensions { width: 0, height: 100 })
        );

        let config = RenderConfig { height: 0, ..base.clone() };
        assert!(config.validate().is_err());

        let config = RenderConfig { samples_per_pixel: 0, ..base.clone() };
        assert_eq!(config.validate(), Err(RenderError::InvalidSamples));

        let config = RenderConfig { max_depth: 0, ..base.clone() };
        assert_eq!(config.validate(), Err(RenderError::InvalidDepth(0)));

        let config = RenderConfig { max_depth: MAX_DEPTH + 1, ..base.clone() };
        assert_eq!(config.validate(), Err(RenderError::InvalidDepth(51)));

        let config = RenderConfig { threads: 0, ..base.clone() };
        assert_eq!(config.validate(), Err(RenderError::InvalidThreads(0)));

        let config = RenderConfig { threads: 100_000, height: 100_000, ..base.clone() };
        assert_eq!(config.validate(), Err(RenderError::InvalidThreads(100_000)));

        let config = RenderConfig { threads: MAX_THREADS, ..base };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_worker_count_capped_by_height() {
        let config = RenderConfig {
            height: 3,
            threads: 8,
            ..RenderConfig::default()
        };
        assert_eq!(config.worker_count(), 3);

        let config = RenderConfig {
            height: 100,
            threads: 8,
            ..RenderConfig::default()
        };
        assert_eq!(config.worker_count(), 8);
    }
}
