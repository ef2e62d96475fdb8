//! Live keyboard synthesizer.
//!
//! Two rows of the computer keyboard form a 16-key piano starting at A2:
//! Z S X C F V G B N J M K , L . /
//! Hold a key to sound a note, release it to let the envelope ring out.
//! Press Q or ESC to quit.
//!
//! Run with: cargo run --example live_keys

use std::io::{stdout, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::ExecutableCommand;

use monovox::{key_frequency, voice, AdsrParams, KeyScanner, Waveform, KEY_COUNT};

/// Key characters in semitone order from A2, matching the diagram below.
const KEY_CHARS: [char; KEY_COUNT] = [
    'z', 's', 'x', 'c', 'f', 'v', 'g', 'b', 'n', 'j', 'm', 'k', ',', 'l', '.', '/',
];

const KEYBOARD_DIAGRAM: &str = "\
|   |   |   |   |   | |   |   |   |   | |   | |   |   |   |
|   | S |   |   | F | | G |   |   | J | | K | | L |   |   |
|   |___|   |   |___| |___|   |   |___| |___| |___|   |   |__
|     |     |     |     |     |     |     |     |     |     |
|  Z  |  X  |  C  |  V  |  B  |  N  |  M  |  ,  |  .  |  /  |
|_____|_____|_____|_____|_____|_____|_____|_____|_____|_____|
";

/// Playback clock shared with the audio callback: total samples written so
/// far. The input side divides by the sample rate to timestamp key events on
/// the same timeline the renderer is evaluated on.
struct SampleClock {
    samples: Arc<AtomicU64>,
    sample_rate: f64,
}

impl SampleClock {
    fn now(&self) -> f64 {
        self.samples.load(Ordering::Relaxed) as f64 / self.sample_rate
    }
}

fn main() -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("no output device available"))?;
    let config = device.default_output_config()?;
    let sample_rate = config.sample_rate().0 as f64;

    println!("monovox - live keyboard synth");
    println!("Output device: {}", device.name()?);
    println!("Sample rate: {} Hz", sample_rate);
    println!();
    println!("{KEYBOARD_DIAGRAM}");

    let (controller, renderer) = voice(Waveform::AnalogSaw, AdsrParams::default());
    println!("Waveform: {:?}", renderer.waveform());
    let samples = Arc::new(AtomicU64::new(0));
    let clock = SampleClock {
        samples: Arc::clone(&samples),
        sample_rate,
    };

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(&device, &config.into(), renderer, samples)?
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(&device, &config.into(), renderer, samples)?
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(&device, &config.into(), renderer, samples)?
        }
        format => return Err(anyhow!("unsupported sample format: {format:?}")),
    };
    stream.play()?;

    let result = run_input_loop(controller, &clock);

    // Terminal state must be restored even when the loop errors out
    let _ = stdout().execute(PopKeyboardEnhancementFlags);
    let _ = disable_raw_mode();
    println!("\nGoodbye!");
    result
}

/// Builds the output stream. Each frame renders one sample at the current
/// clock time, scales it down, and duplicates it to every channel.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    renderer: monovox::Renderer,
    samples: Arc<AtomicU64>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f64>,
{
    let channels = config.channels as usize;
    let sample_rate = config.sample_rate.0 as f64;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            let mut n = samples.load(Ordering::Relaxed);
            for frame in data.chunks_mut(channels) {
                let time = n as f64 / sample_rate;
                let value = renderer.render(time) * 0.3;
                let sample = T::from_sample(value);
                for out in frame.iter_mut() {
                    *out = sample;
                }
                n += 1;
            }
            samples.store(n, Ordering::Relaxed);
        },
        |err| eprintln!("audio stream error: {err}"),
        None,
    )?;

    Ok(stream)
}

/// Polls the terminal for key transitions and feeds them to the scanner.
fn run_input_loop(mut controller: monovox::Controller, clock: &SampleClock) -> Result<()> {
    enable_raw_mode()?;
    // Needed so terminals report key releases, not just presses
    stdout().execute(PushKeyboardEnhancementFlags(
        KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
    ))?;

    let mut scanner = KeyScanner::new();
    let mut pressed = [false; KEY_COUNT];

    loop {
        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(key_event) = event::read()? {
                match key_event.code {
                    KeyCode::Char('q') | KeyCode::Esc
                        if matches!(key_event.kind, KeyEventKind::Press) =>
                    {
                        controller.note_off(clock.now());
                        return Ok(());
                    }
                    KeyCode::Char(c) => {
                        if let Some(key) = KEY_CHARS.iter().position(|&k| k == c) {
                            pressed[key] = matches!(
                                key_event.kind,
                                KeyEventKind::Press | KeyEventKind::Repeat
                            );
                        }
                    }
                    _ => {}
                }
            }
        }

        let before = scanner.current_key();
        let time = clock.now();
        scanner.scan(&pressed, time, &mut controller);

        if scanner.current_key() != before {
            let mut out = stdout();
            match scanner.current_key() {
                Some(key) => write!(
                    out,
                    "\rNote On : {time:.3}s {:.2}Hz          ",
                    key_frequency(key)
                )?,
                None => write!(out, "\rNote Off: {time:.3}s                  ")?,
            }
            out.flush()?;
        }
    }
}
