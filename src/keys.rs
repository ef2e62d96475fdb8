//! Key-index pitch mapping and the poll-and-diff key scanner.
//!
//! The core never sees raw key codes. A host loop samples whatever input
//! device it has into a boolean per key and hands that to [`KeyScanner`],
//! which diffs it against the previous poll and drives the [`Controller`]
//! with note on/off transitions. That keeps key handling testable with plain
//! arrays, with no hardware or timing dependence.

use crate::engine::Controller;

/// Frequency of key 0, in Hz (A2).
pub const BASE_FREQUENCY: f64 = 110.0;

/// Number of playable keys: equal-tempered semitones 0..16 up from A2.
pub const KEY_COUNT: usize = 16;

/// Maps a key index to its equal-tempered frequency:
/// `110 * 2^(key / 12)` Hz.
///
/// # Examples
///
/// ```
/// use monovox::key_frequency;
///
/// assert_eq!(key_frequency(0), 110.0);
/// assert!((key_frequency(12) - 220.0).abs() < 1e-9); // one octave up
/// ```
pub fn key_frequency(key: usize) -> f64 {
    BASE_FREQUENCY * 2.0_f64.powf(key as f64 / 12.0)
}

/// Tracks which key is sounding and turns polled key state into note events.
///
/// Scan semantics, kept from the original voice: keys are walked in
/// ascending order and any held key that differs from the current one
/// triggers a fresh note, so when several keys are held the highest index
/// wins. The transition to "no keys held" triggers a single note off.
///
/// # Examples
///
/// ```
/// use monovox::{voice, AdsrParams, KeyScanner, Waveform, KEY_COUNT};
///
/// let (mut controller, _renderer) = voice(Waveform::Sine, AdsrParams::default());
/// let mut scanner = KeyScanner::new();
///
/// let mut pressed = [false; KEY_COUNT];
/// pressed[4] = true;
/// scanner.scan(&pressed, 0.0, &mut controller); // note on, key 4
///
/// pressed[4] = false;
/// scanner.scan(&pressed, 0.5, &mut controller); // note off
/// ```
#[derive(Debug, Default)]
pub struct KeyScanner {
    current: Option<usize>,
}

impl KeyScanner {
    /// Creates a scanner with no key sounding.
    pub fn new() -> Self {
        Self::default()
    }

    /// The key currently sounding, if any.
    pub fn current_key(&self) -> Option<usize> {
        self.current
    }

    /// Diffs `pressed` against the previous poll and fires the resulting
    /// note transitions on `controller`, stamped with `time` (seconds).
    pub fn scan(&mut self, pressed: &[bool; KEY_COUNT], time: f64, controller: &mut Controller) {
        let mut any_pressed = false;

        for (key, &down) in pressed.iter().enumerate() {
            if down {
                if self.current != Some(key) {
                    controller.press_key(key, time);
                    self.current = Some(key);
                }
                any_pressed = true;
            }
        }

        if !any_pressed && self.current.is_some() {
            controller.note_off(time);
            self.current = None;
        }
    }
}
