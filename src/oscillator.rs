//! Oscillator waveform family.
//!
//! Every waveform is evaluated as a pure function of frequency and absolute
//! time, so the renderer carries no per-oscillator phase state and a pitch
//! change takes effect on the very next sample.
//!
//! Waveform character, roughly:
//! - Sine: pure tone, fundamental only
//! - Square: hollow, odd harmonics
//! - Triangle: soft, weak odd harmonics
//! - AnalogSaw: bright and warm, built additively from 99 harmonics
//! - DigitalSaw: the same shape in closed form, harsher and much cheaper
//! - Noise: unpitched hiss

use std::f64::consts::{FRAC_2_PI, FRAC_PI_2, PI, TAU};

use rand::Rng;

/// Number of harmonics summed for [`Waveform::AnalogSaw`].
const SAW_HARMONICS: u32 = 99;

/// The closed set of available waveforms.
///
/// One variant is wired into a renderer at construction; selection is not
/// per-note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Pure sine wave between -1 and +1
    Sine,
    /// Square wave, exactly -1 or +1
    Square,
    /// Triangle wave between -1 and +1
    Triangle,
    /// Additive sawtooth: sum of `sin(n*w*t)/n` over 99 harmonics. Warm but
    /// expensive; 99 trigonometric evaluations per sample make this the
    /// performance-critical path of the renderer.
    AnalogSaw,
    /// Closed-form sawtooth from the fractional position within one period.
    /// Harsh but fast.
    DigitalSaw,
    /// Uniform pseudorandom value in [-1, 1] per call, not reproducible
    Noise,
}

impl Waveform {
    /// Evaluates the waveform at `time` seconds for a tone at `frequency` Hz.
    ///
    /// The result is in or near `[-1, 1]` (the additive saw's truncated
    /// harmonic series can overshoot slightly). Pure and stateless except for
    /// `Noise`, which draws from the thread-local RNG.
    ///
    /// `frequency` must be positive; this is a documented precondition, not a
    /// validated one.
    ///
    /// # Examples
    ///
    /// ```
    /// use monovox::Waveform;
    ///
    /// let sample = Waveform::Square.evaluate(440.0, 0.123);
    /// assert!(sample == 1.0 || sample == -1.0);
    /// ```
    pub fn evaluate(self, frequency: f64, time: f64) -> f64 {
        let omega = TAU * frequency;

        match self {
            Waveform::Sine => (omega * time).sin(),

            Waveform::Square => {
                if (omega * time).sin() > 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }

            Waveform::Triangle => (omega * time).sin().asin() * FRAC_2_PI,

            Waveform::AnalogSaw => {
                let mut output = 0.0;
                for n in 1..=SAW_HARMONICS {
                    let n = f64::from(n);
                    output += (n * omega * time).sin() / n;
                }
                output * FRAC_2_PI
            }

            Waveform::DigitalSaw => {
                let phase = time % (1.0 / frequency);
                FRAC_2_PI * (frequency * PI * phase - FRAC_PI_2)
            }

            Waveform::Noise => rand::thread_rng().gen_range(-1.0..=1.0),
        }
    }
}
