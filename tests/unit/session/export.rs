use super::*;
use crate::assets::text::FontBook;
use crate::encode::sink::InMemorySink;
use crate::session::engine::MoireEngine;
use crate::settings::model::Mode;

fn opts() -> EngineOpts {
    EngineOpts::default().with_fonts(FontBook::new())
}

fn line(animated: bool) -> Settings {
    let mut s = Settings::default();
    s.mode = Mode::Line;
    s.line.curve_enabled = true;
    s.global.animation_enabled = animated;
    s
}

#[test]
fn sequence_times_follow_engine_ticks() {
    let o = opts();
    let mut s = line(true);
    assert!((sequence_time(&s, &o, 0) - 0.016).abs() < 1e-12);
    assert!((sequence_time(&s, &o, 9) - 0.16).abs() < 1e-12);
    s.global.reverse = true;
    assert!((sequence_time(&s, &o, 1) + 0.032).abs() < 1e-12);
    assert_eq!(sequence_time(&line(false), &o, 7), 0.0);
}

#[test]
fn sequence_clock_is_bit_identical_to_engine_ticks() {
    for reverse in [false, true] {
        let mut s = line(true);
        s.global.reverse = reverse;
        let mut engine = MoireEngine::new(Canvas::new(4, 4).unwrap(), s.clone(), opts()).unwrap();
        engine.start();

        let clock: Vec<f64> = sequence_times(&s, &opts()).take(200).collect();
        for (idx, &t) in clock.iter().enumerate() {
            engine.tick().unwrap();
            assert_eq!(t, engine.time(), "frame {idx}");
            assert_eq!(sequence_time(&s, &opts(), idx as u64), engine.time());
        }
    }
}

#[test]
fn parallel_export_matches_the_engine() {
    let s = line(true);
    let canvas = Canvas::new(24, 16).unwrap();

    let mut engine = MoireEngine::new(canvas, s.clone(), opts()).unwrap();
    let mut sink = InMemorySink::new();
    engine.run(5, &mut sink).unwrap();

    let frames = render_sequence(&s, canvas, &opts(), 5, Some(2)).unwrap();
    assert_eq!(frames.len(), 5);
    for ((_, expected), got) in sink.frames().iter().zip(&frames) {
        assert_eq!(expected, got);
    }
}

#[test]
fn export_streams_frames_in_order() {
    let canvas = Canvas::new(8, 8).unwrap();
    let mut sink = InMemorySink::new();
    export_sequence(&line(false), canvas, &opts(), 40, Some(3), &mut sink).unwrap();

    assert!(sink.is_finished());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| *i).collect();
    assert_eq!(idx, (0..40).collect::<Vec<_>>());
    let first = &sink.frames()[0].1;
    assert!(sink.frames().iter().all(|(_, f)| f == first));
}

#[test]
fn zero_threads_is_rejected() {
    let canvas = Canvas::new(8, 8).unwrap();
    assert!(render_sequence(&line(false), canvas, &opts(), 1, Some(0)).is_err());
}
