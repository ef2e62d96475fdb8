//! ADSR (Attack, Decay, Sustain, Release) envelope generator.
//!
//! Unlike a per-sample stepped envelope, this one is a pure function of
//! absolute playback time: the gate records *when* the note went on or off,
//! and [`AdsrParams::amplitude`] evaluates the piecewise-linear shape at any
//! requested instant. That makes the envelope trivially shareable between an
//! input thread (which flips the gate) and a render thread (which only reads).

/// The shape parameters of an ADSR envelope.
///
/// Times are in seconds, levels in `[0, 1]`. `start_amplitude` is the peak
/// the attack ramp reaches before decay begins; it is almost always `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    /// Seconds to ramp from 0 to `start_amplitude`
    pub attack_time: f64,
    /// Seconds to ramp from `start_amplitude` to `sustain_level`
    pub decay_time: f64,
    /// Level held while the gate stays open (0.0 to 1.0)
    pub sustain_level: f64,
    /// Seconds to ramp from `sustain_level` to 0 after note off
    pub release_time: f64,
    /// Peak level reached at the end of the attack phase
    pub start_amplitude: f64,
}

/// Amplitudes at or below this clamp to exactly zero, silencing
/// near-zero release tails.
const SILENCE_FLOOR: f64 = 1e-4;

impl Default for AdsrParams {
    /// A plucky general-purpose envelope: 100ms attack, 10ms decay,
    /// 80% sustain, 200ms release.
    fn default() -> Self {
        Self {
            attack_time: 0.10,
            decay_time: 0.01,
            sustain_level: 0.8,
            release_time: 0.20,
            start_amplitude: 1.0,
        }
    }
}

impl AdsrParams {
    /// Creates envelope parameters with the given attack, decay, sustain and
    /// release, and a peak level of 1.0.
    ///
    /// # Arguments
    ///
    /// * `attack` - Attack time in seconds (0 or positive)
    /// * `decay` - Decay time in seconds (0 or positive)
    /// * `sustain` - Sustain level (0.0 to 1.0, will be clamped)
    /// * `release` - Release time in seconds (0 or positive)
    ///
    /// # Examples
    ///
    /// ```
    /// use monovox::AdsrParams;
    ///
    /// let params = AdsrParams::new(0.01, 0.05, 0.7, 0.1);
    /// assert_eq!(params.sustain_level, 0.7);
    /// ```
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack_time: attack.max(0.0),
            decay_time: decay.max(0.0),
            sustain_level: sustain.clamp(0.0, 1.0),
            release_time: release.max(0.0),
            start_amplitude: 1.0,
        }
    }

    /// Evaluates the envelope at `time` for the given gate state.
    ///
    /// While the gate is open the phase is determined by the note's lifetime
    /// (`time - gate.on_time`): attack, then decay, then sustain held
    /// indefinitely. Once the gate closes the output ramps linearly from
    /// `sustain_level` at `gate.off_time` down to zero over `release_time`,
    /// independent of how long the note had been held. Zero-length phases are
    /// instantaneous jumps to the phase target, never a division by zero.
    ///
    /// The result is clamped to exactly 0.0 at or below `1e-4`.
    pub fn amplitude(&self, gate: Gate, time: f64) -> f64 {
        let amplitude = if gate.open {
            let life = time - gate.on_time;

            if life <= self.attack_time {
                if self.attack_time <= 0.0 {
                    // Instantaneous attack: jump straight to peak
                    self.start_amplitude
                } else {
                    (life / self.attack_time) * self.start_amplitude
                }
            } else if life <= self.attack_time + self.decay_time {
                if self.decay_time <= 0.0 {
                    self.sustain_level
                } else {
                    let progress = (life - self.attack_time) / self.decay_time;
                    self.start_amplitude + progress * (self.sustain_level - self.start_amplitude)
                }
            } else {
                self.sustain_level
            }
        } else if self.release_time <= 0.0 {
            0.0
        } else {
            // Release always ramps from the sustain level, even when the note
            // was let go mid-attack. The original voice behaved this way and
            // the audible step it can produce is kept as-is.
            let progress = (time - gate.off_time) / self.release_time;
            if progress >= 1.0 {
                // Release finished; also covers the never-triggered gate,
                // whose off_time of -inf puts progress at +inf.
                0.0
            } else {
                self.sustain_level - progress * self.sustain_level
            }
        };

        if amplitude <= SILENCE_FLOOR {
            0.0
        } else {
            amplitude
        }
    }
}

/// Note on/off state on a monotonic timeline.
///
/// While `open` is true, `on_time` holds the most recent note-on time; while
/// false, `off_time` holds the most recent note-off time. A fresh gate
/// starts with `off_time` at negative infinity so that a voice that has
/// never been triggered reads as a long-finished release, not as one
/// released at `t = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    /// Whether a note is currently held
    pub open: bool,
    /// Time of the most recent note-on, in seconds
    pub on_time: f64,
    /// Time of the most recent note-off, in seconds
    pub off_time: f64,
}

impl Default for Gate {
    fn default() -> Self {
        Self {
            open: false,
            on_time: 0.0,
            off_time: f64::NEG_INFINITY,
        }
    }
}

/// A single-threaded ADSR envelope: parameters plus gate state.
///
/// This is the envelope as one voice sees it. For the cross-thread variant,
/// where the gate lives in atomics shared between a controller and a
/// renderer, see [`crate::voice`]; both paths evaluate through the same
/// [`AdsrParams::amplitude`].
///
/// # Examples
///
/// ```
/// use monovox::{Adsr, AdsrParams};
///
/// let mut env = Adsr::new(AdsrParams::new(0.1, 0.01, 0.8, 0.1));
///
/// env.note_on(0.0);
/// assert!((env.amplitude(0.1) - 1.0).abs() < 1e-9); // attack peak
/// assert!((env.amplitude(0.5) - 0.8).abs() < 1e-9); // sustained
///
/// env.note_off(0.5);
/// assert!((env.amplitude(0.55) - 0.4).abs() < 1e-9); // mid release
/// assert_eq!(env.amplitude(0.7), 0.0); // released
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Adsr {
    params: AdsrParams,
    gate: Gate,
}

impl Adsr {
    /// Creates an envelope with the given parameters and a closed gate.
    pub fn new(params: AdsrParams) -> Self {
        Self {
            params,
            gate: Gate::default(),
        }
    }

    /// Opens the gate at `time`, restarting the attack ramp from zero.
    ///
    /// Calling this while a release is still in progress discards the release
    /// immediately; the next evaluated sample sits on the fresh attack ramp.
    pub fn note_on(&mut self, time: f64) {
        self.gate.open = true;
        self.gate.on_time = time;
    }

    /// Closes the gate at `time`, starting the release ramp.
    pub fn note_off(&mut self, time: f64) {
        self.gate.open = false;
        self.gate.off_time = time;
    }

    /// Returns true while a note is held.
    pub fn is_open(&self) -> bool {
        self.gate.open
    }

    /// The current gate state.
    pub fn gate(&self) -> Gate {
        self.gate
    }

    /// The envelope's shape parameters.
    pub fn params(&self) -> AdsrParams {
        self.params
    }

    /// Evaluates the envelope amplitude at `time`. Always in `[0, 1]` for
    /// parameters with `start_amplitude <= 1.0`.
    pub fn amplitude(&self, time: f64) -> f64 {
        self.params.amplitude(self.gate, time)
    }
}
