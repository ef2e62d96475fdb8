//! Monovox - a monophonic synthesizer voice driven by live key events.
//!
//! One voice, one pitch, one envelope: a key press selects an equal-tempered
//! frequency, opens the envelope gate, and the renderer multiplies the ADSR
//! amplitude by an oscillator waveform for every output sample.
//!
//! The crate is split along the two execution contexts of a live synth:
//! [`Controller`] belongs to the input-polling side and is the only writer of
//! shared state, [`Renderer`] belongs to the audio callback and is the only
//! reader. The render path never locks, allocates, or blocks.
//!
//! # Examples
//!
//! ```
//! use monovox::{key_frequency, voice, AdsrParams, Waveform};
//!
//! let (mut controller, renderer) = voice(Waveform::Sine, AdsrParams::default());
//!
//! // Input side: key 3 pressed at t = 0.5s.
//! controller.set_pitch(key_frequency(3));
//! controller.note_on(0.5);
//!
//! // Output side: one sample at t = 0.6s.
//! let sample = renderer.render(0.6);
//! assert!(sample.abs() <= 1.0);
//! ```

pub mod engine;
pub mod envelope;
pub mod keys;
pub mod oscillator;
pub mod pitch;

// Re-export commonly used types at the crate root
pub use engine::{voice, Controller, Renderer};
pub use envelope::{Adsr, AdsrParams, Gate};
pub use keys::{key_frequency, KeyScanner, BASE_FREQUENCY, KEY_COUNT};
pub use oscillator::Waveform;
pub use pitch::{AtomicF64, PitchCell};
