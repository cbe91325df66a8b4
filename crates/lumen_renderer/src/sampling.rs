//! Random sampling helpers.
//!
//! Every function takes the generator explicitly. Workers own their own
//! generator, so nothing here is shared between threads.

use lumen_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Uniform f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform point strictly inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform point strictly inside the unit disk in the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Generator for one render worker.
///
/// The worker id is spread with a 64-bit golden ratio multiplier before being
/// mixed into the seed, so neighbouring workers get unrelated streams.
pub fn worker_rng(seed: u64, worker: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ worker.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_random_in_unit_sphere() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert!(random_in_unit_sphere(&mut rng).length_squared() < 1.0);
        }
    }

    #[test]
    fn test_random_in_unit_disk() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let p = random_in_unit_disk(&mut rng);
            assert!(p.length_squared() < 1.0);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_worker_rng_streams() {
        let a: Vec<u32> = (0..4).map(|_| worker_rng(1, 0).next_u32()).collect();
        // Same seed and worker reproduce the stream
        assert!(a.iter().all(|&x| x == a[0]));

        let mut w0 = worker_rng(1, 0);
        let mut w1 = worker_rng(1, 1);
        let s0: Vec<u64> = (0..8).map(|_| w0.next_u64()).collect();
        let s1: Vec<u64> = (0..8).map(|_| w1.next_u64()).collect();
        assert_ne!(s0, s1);
    }
}
