//! End-to-end tests of the split controller/renderer voice.

use monovox::{key_frequency, voice, AdsrParams, KeyScanner, Waveform, KEY_COUNT};

const SAMPLE_RATE: f64 = 44_100.0;

/// Renders `n` consecutive samples starting at `start` seconds.
fn render_run(renderer: &monovox::Renderer, start: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| renderer.render(start + i as f64 / SAMPLE_RATE))
        .collect()
}

#[test]
fn full_key_press_lifecycle() {
    let (mut controller, renderer) = voice(Waveform::AnalogSaw, AdsrParams::default());
    let mut scanner = KeyScanner::new();
    let mut pressed = [false; KEY_COUNT];

    // Silence before any input
    assert!(render_run(&renderer, 0.0, 64).iter().all(|&s| s == 0.0));

    // Key down: sound ramps up through attack
    pressed[5] = true;
    scanner.scan(&pressed, 0.01, &mut controller);
    let sounding = render_run(&renderer, 0.05, 256);
    assert!(sounding.iter().any(|&s| s.abs() > 0.01));
    assert!(sounding.iter().all(|&s| s.abs() <= 1.2));

    // Key up: release tail, then silence
    pressed[5] = false;
    scanner.scan(&pressed, 0.5, &mut controller);
    let tail = render_run(&renderer, 0.55, 64);
    assert!(tail.iter().any(|&s| s.abs() > 0.0));
    assert!(render_run(&renderer, 1.0, 64).iter().all(|&s| s == 0.0));
}

#[test]
fn reference_envelope_timeline() {
    // The canonical ADSR timeline: A=0.1, D=0.01, S=0.8, R=0.1, with a sine
    // so samples can be checked against amplitude * waveform exactly.
    let params = AdsrParams::new(0.1, 0.01, 0.8, 0.1);
    let (mut controller, renderer) = voice(Waveform::Sine, params);
    controller.set_pitch(220.0);
    controller.note_on(0.0);

    let check = |t: f64, amp: f64| {
        let expected = amp * Waveform::Sine.evaluate(220.0, t);
        let actual = renderer.render(t);
        assert!(
            (actual - expected).abs() < 1e-9,
            "at t={t}: expected {expected}, got {actual}"
        );
    };

    check(0.0, 0.0);
    check(0.1, 1.0);
    check(0.11, 0.8);
    check(0.5, 0.8);

    controller.note_off(0.5);
    check(0.55, 0.4);
    assert_eq!(renderer.render(0.6), 0.0);
}

#[test]
fn retrigger_restarts_attack_not_release() {
    let params = AdsrParams::new(0.1, 0.01, 0.8, 0.1);
    let (mut controller, renderer) = voice(Waveform::Sine, params);

    controller.press_key(0, 0.0);
    controller.note_off(0.05);
    controller.press_key(0, 0.06);

    // If the release had continued we would see ~0.72 here; the fresh attack
    // ramp puts us at exactly zero instead.
    assert_eq!(renderer.render(0.06), 0.0);

    // 40ms into the new attack: amplitude 0.4
    let t = 0.10;
    let expected = 0.4 * Waveform::Sine.evaluate(key_frequency(0), t);
    assert!((renderer.render(t) - expected).abs() < 1e-9);
}

#[test]
fn key_map_matches_equal_temperament() {
    for k in 0..KEY_COUNT {
        let expected = 110.0 * 2.0_f64.powf(k as f64 / 12.0);
        assert!((key_frequency(k) - expected).abs() < 1e-9);
        if k > 0 {
            assert!(key_frequency(k) > key_frequency(k - 1));
        }
    }
}

#[test]
fn every_waveform_renders_bounded_output() {
    let waveforms = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::AnalogSaw,
        Waveform::DigitalSaw,
        Waveform::Noise,
    ];

    for waveform in waveforms {
        let (mut controller, renderer) = voice(waveform, AdsrParams::new(0.01, 0.01, 0.8, 0.1));
        controller.press_key(9, 0.0);

        for sample in render_run(&renderer, 0.02, 512) {
            assert!(sample.is_finite());
            assert!(
                sample.abs() <= 1.2,
                "{waveform:?} rendered out-of-range sample {sample}"
            );
        }
    }
}

#[test]
fn concurrent_controller_and_renderer() {
    // Writer hammers pitch and gate from one thread while the reader renders
    // from another. The two clocks are not synchronized here, so exact
    // values are off the table; the output must stay finite and sane while
    // state changes race the render loop.
    let (mut controller, renderer) = voice(Waveform::DigitalSaw, AdsrParams::default());

    let writer = std::thread::spawn(move || {
        for i in 0..5_000usize {
            let time = i as f64 / 5_000.0;
            match i % 4 {
                0 => controller.press_key(i % KEY_COUNT, time),
                1 => controller.set_pitch(key_frequency(i % KEY_COUNT)),
                2 => controller.note_off(time),
                _ => controller.note_on(time),
            }
        }
        controller.note_off(1.0);
    });

    for i in 0..50_000usize {
        let sample = renderer.render(i as f64 / SAMPLE_RATE);
        assert!(sample.is_finite());
        assert!(sample.abs() < 16.0, "wild sample {sample}");
    }

    writer.join().unwrap();
}
