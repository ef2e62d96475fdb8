//! Shared pitch state between the input and render threads.

use std::sync::atomic::{AtomicU64, Ordering};

/// An `f64` that can be read and written atomically, stored as raw bits in
/// an [`AtomicU64`]. A reader on another thread always sees a complete
/// value, never a torn one.
#[derive(Debug)]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    /// Creates a new atomic holding `value`.
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    /// Stores `value` with the given memory ordering.
    pub fn store(&self, value: f64, order: Ordering) {
        self.bits.store(value.to_bits(), order);
    }

    /// Loads the current value with the given memory ordering.
    pub fn load(&self, order: Ordering) -> f64 {
        f64::from_bits(self.bits.load(order))
    }
}

/// The frequency of the most recently triggered note, in Hz.
///
/// Last-write-wins: there is no queue of pending pitch changes and no
/// interpolation, so the next rendered sample reflects a new value with a
/// hard discontinuity. The cell is safe to write from an input thread while
/// a render thread reads it.
///
/// # Examples
///
/// ```
/// use monovox::PitchCell;
///
/// let pitch = PitchCell::new(440.0);
/// pitch.set(220.0);
/// assert_eq!(pitch.get(), 220.0);
/// ```
#[derive(Debug)]
pub struct PitchCell(AtomicF64);

impl PitchCell {
    /// Creates a cell holding `frequency` Hz.
    pub fn new(frequency: f64) -> Self {
        Self(AtomicF64::new(frequency))
    }

    /// Overwrites the frequency, replacing whatever note was in flight.
    pub fn set(&self, frequency: f64) {
        self.0.store(frequency, Ordering::Relaxed);
    }

    /// Reads the current frequency.
    pub fn get(&self) -> f64 {
        self.0.load(Ordering::Relaxed)
    }
}
