//! The voice engine: shared state plus a split writer/reader handle pair.
//!
//! A live synth runs in two execution contexts. The input side polls keys at
//! event-loop speed; the render side is called by the audio backend once per
//! sample, with tens of microseconds to spare and often at elevated priority.
//! Any lock, allocation, or syscall on the render side is an audible glitch.
//!
//! [`voice`] therefore hands out two owned handles over one shared block of
//! atomics: a [`Controller`] for the input context and a [`Renderer`] for the
//! render context. Neither is `Clone`, so the single-writer/single-reader
//! contract is enforced by ownership rather than by convention.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::envelope::{AdsrParams, Gate};
use crate::oscillator::Waveform;
use crate::pitch::{AtomicF64, PitchCell};

/// State shared between the two handles. Trigger times are published before
/// the gate flag (release on store, acquire on load), so a reader that
/// observes a gate transition always sees the matching timestamp.
#[derive(Debug)]
struct Shared {
    pitch: PitchCell,
    gate_open: AtomicBool,
    on_time: AtomicF64,
    off_time: AtomicF64,
    params: AdsrParams,
}

/// Creates a monophonic voice, returning the input-side and render-side
/// handles.
///
/// The voice starts silent (gate closed), with the pitch cell holding
/// [`crate::BASE_FREQUENCY`] until the first [`Controller::set_pitch`].
///
/// # Examples
///
/// ```
/// use monovox::{voice, AdsrParams, Waveform};
///
/// let (mut controller, renderer) = voice(Waveform::AnalogSaw, AdsrParams::default());
///
/// // Nothing pressed yet: silence.
/// assert_eq!(renderer.render(0.0), 0.0);
///
/// controller.set_pitch(220.0);
/// controller.note_on(0.0);
/// let sample = renderer.render(0.05);
/// assert!(sample.abs() <= 1.1);
/// ```
pub fn voice(waveform: Waveform, params: AdsrParams) -> (Controller, Renderer) {
    let shared = Arc::new(Shared {
        pitch: PitchCell::new(crate::keys::BASE_FREQUENCY),
        gate_open: AtomicBool::new(false),
        on_time: AtomicF64::new(0.0),
        // Matches Gate::default(): an untriggered voice reads as a release
        // that finished long ago, so it renders silence from sample one.
        off_time: AtomicF64::new(f64::NEG_INFINITY),
        params,
    });

    (
        Controller {
            shared: Arc::clone(&shared),
        },
        Renderer { shared, waveform },
    )
}

/// The input-side handle: the sole writer of pitch and gate state.
///
/// Every new note unconditionally preempts the previous one; there is no
/// voice pool and no queue.
#[derive(Debug)]
pub struct Controller {
    shared: Arc<Shared>,
}

impl Controller {
    /// Sets the frequency the renderer reads, in Hz. Takes effect on the
    /// next rendered sample with a hard discontinuity.
    pub fn set_pitch(&mut self, frequency: f64) {
        self.shared.pitch.set(frequency);
    }

    /// Opens the gate at `time` seconds, restarting the envelope's attack
    /// from zero. An in-flight release is discarded without a crossfade.
    pub fn note_on(&mut self, time: f64) {
        self.shared.on_time.store(time, Ordering::Relaxed);
        self.shared.gate_open.store(true, Ordering::Release);
    }

    /// Closes the gate at `time` seconds, starting the envelope's release.
    pub fn note_off(&mut self, time: f64) {
        self.shared.off_time.store(time, Ordering::Relaxed);
        self.shared.gate_open.store(false, Ordering::Release);
    }

    /// Convenience for the common case: resolve `key` through
    /// [`crate::key_frequency`] and trigger the note at `time`.
    ///
    /// `key` must be in `0..16`; the input collaborator filters raw key
    /// codes before calling in.
    pub fn press_key(&mut self, key: usize, time: f64) {
        self.set_pitch(crate::keys::key_frequency(key));
        self.note_on(time);
    }
}

/// The render-side handle: the sole reader, called once per output sample.
#[derive(Debug)]
pub struct Renderer {
    shared: Arc<Shared>,
    waveform: Waveform,
}

impl Renderer {
    /// Produces one output sample for playback time `time` (seconds).
    ///
    /// `time` must be monotonically non-decreasing across calls, advancing
    /// by `1/sample_rate` in the common case. The result is the envelope
    /// amplitude times the waveform value, in approximately `[-1, 1]`;
    /// scaling to the device sample format is the caller's job.
    ///
    /// Does no allocation, locking, or I/O.
    pub fn render(&self, time: f64) -> f64 {
        let gate = self.gate();
        let amplitude = self.shared.params.amplitude(gate, time);
        if amplitude == 0.0 {
            // Skip the oscillator entirely while silent; with the additive
            // saw that saves 99 sin() calls per sample.
            return 0.0;
        }

        amplitude * self.waveform.evaluate(self.shared.pitch.get(), time)
    }

    /// The waveform this renderer was built with.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Snapshot of the gate as published by the controller.
    fn gate(&self) -> Gate {
        let open = self.shared.gate_open.load(Ordering::Acquire);
        Gate {
            open,
            on_time: self.shared.on_time.load(Ordering::Relaxed),
            off_time: self.shared.off_time.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_before_first_note() {
        let (_controller, renderer) = voice(Waveform::AnalogSaw, AdsrParams::default());
        assert_eq!(renderer.waveform(), Waveform::AnalogSaw);
        assert_eq!(renderer.render(0.0), 0.0);
        // Inside what would be the release window of a note released at t = 0
        assert_eq!(renderer.render(0.001), 0.0);
        assert_eq!(renderer.render(1.0), 0.0);
    }

    #[test]
    fn test_render_is_amplitude_times_waveform() {
        let params = AdsrParams::new(0.1, 0.01, 0.8, 0.1);
        let (mut controller, renderer) = voice(Waveform::Sine, params);

        controller.set_pitch(220.0);
        controller.note_on(0.0);

        let t = 0.05; // mid attack: amplitude 0.5
        let expected = 0.5 * Waveform::Sine.evaluate(220.0, t);
        assert!((renderer.render(t) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_pitch_change_applies_to_next_sample() {
        let (mut controller, renderer) = voice(Waveform::Sine, AdsrParams::new(0.0, 0.0, 1.0, 0.1));

        controller.set_pitch(220.0);
        controller.note_on(0.0);
        let t = 0.37;
        let before = renderer.render(t);
        assert!((before - Waveform::Sine.evaluate(220.0, t)).abs() < 1e-9);

        // No retrigger needed: the very next render reflects the new pitch
        controller.set_pitch(440.0);
        let after = renderer.render(t);
        assert!((after - Waveform::Sine.evaluate(440.0, t)).abs() < 1e-9);
    }

    #[test]
    fn test_note_off_then_silence() {
        let (mut controller, renderer) = voice(Waveform::Square, AdsrParams::new(0.0, 0.0, 0.8, 0.1));

        controller.set_pitch(110.0);
        controller.note_on(0.0);
        controller.note_off(1.0);

        assert!(renderer.render(1.05).abs() <= 0.45); // mid release, amp 0.4
        assert_eq!(renderer.render(1.2), 0.0);
    }

    #[test]
    fn test_retrigger_preempts_release() {
        let params = AdsrParams::new(0.1, 0.01, 0.8, 0.1);
        let (mut controller, renderer) = voice(Waveform::Sine, params);

        controller.press_key(0, 0.0);
        controller.note_off(0.05);
        controller.press_key(5, 0.06);

        // Amplitude restarts on the attack ramp near zero
        assert_eq!(renderer.render(0.06), 0.0);
        let mid_attack = renderer.render(0.11);
        assert!(mid_attack.abs() <= 0.5 + 1e-9);
    }

    #[test]
    fn test_press_key_sets_equal_tempered_pitch() {
        let (mut controller, renderer) = voice(Waveform::Sine, AdsrParams::new(0.0, 0.0, 1.0, 0.1));

        controller.press_key(12, 0.0); // one octave above base
        let t = 0.25;
        let expected = Waveform::Sine.evaluate(220.0, t);
        assert!((renderer.render(t) - expected).abs() < 1e-6);
    }
}
