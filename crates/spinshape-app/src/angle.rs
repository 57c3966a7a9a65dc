use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Rotation angle in degrees, shared between the input side and the renderer.
///
/// Stores the `f32` bit pattern in an atomic. Clones observe the same value.
#[derive(Debug, Clone, Default)]
pub struct SharedAngle(Arc<AtomicU32>);

impl SharedAngle {
    pub fn new(degrees: f32) -> Self {
        Self(Arc::new(AtomicU32::new(degrees.to_bits())))
    }

    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, degrees: f32) {
        self.0.store(degrees.to_bits(), Ordering::Release);
    }

    /// Adds `delta` degrees and returns the new angle.
    pub fn add(&self, delta: f32) -> f32 {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            let next = (f32::from_bits(current) + delta).to_bits();
            match self
                .0
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return f32::from_bits(next),
                Err(actual) => current = actual,
            }
        }
    }
}
