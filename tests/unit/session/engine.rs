use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Rgba8;
use crate::settings::model::Mode;

fn opts() -> EngineOpts {
    EngineOpts::default().with_fonts(FontBook::new())
}

fn settings(animated: bool) -> Settings {
    let mut s = Settings::default();
    s.mode = Mode::Line;
    s.global.animation_enabled = animated;
    s
}

fn engine(s: Settings) -> MoireEngine {
    MoireEngine::new(Canvas::new(32, 24).unwrap(), s, opts()).unwrap()
}

#[test]
fn stopped_engines_do_not_tick() {
    let mut e = engine(settings(true));
    assert_eq!(e.state(), EngineState::Stopped);
    assert!(e.tick().unwrap().is_none());
    assert_eq!(e.time(), 0.0);
    assert!(e.frame().data.is_empty());
}

#[test]
fn start_and_stop_are_idempotent() {
    let mut e = engine(settings(true));
    e.start();
    e.start();
    assert_eq!(e.state(), EngineState::Running);
    e.stop();
    e.stop();
    assert_eq!(e.state(), EngineState::Stopped);
}

#[test]
fn animated_ticks_step_time() {
    let mut e = engine(settings(true));
    e.start();
    let frame = e.tick().unwrap().unwrap();
    assert_eq!((frame.width, frame.height), (32, 24));
    e.tick().unwrap();
    assert!((e.time() - 0.032).abs() < 1e-12);

    let mut s = settings(true);
    s.global.reverse = true;
    e.update_settings(s);
    e.tick().unwrap();
    assert!((e.time() - 0.016).abs() < 1e-12);
}

#[test]
fn paused_ticks_reuse_the_frame() {
    let mut e = engine(settings(false));
    e.start();
    let first = e.tick().unwrap().unwrap().clone();
    let second = e.tick().unwrap().unwrap().clone();
    assert_eq!(e.time(), 0.0);
    assert_eq!(first, second);

    let mut s = settings(false);
    s.global.background = Rgba8::rgb(200, 0, 0);
    s.global.cutoff_base = 0.0;
    s.global.cutoff_reveal = 0.0;
    e.update_settings(s);
    let third = e.tick().unwrap().unwrap();
    assert_eq!(third.pixel(0, 0), Some([200, 0, 0, 255]));
}

#[test]
fn resize_validates_and_redraws() {
    let mut e = engine(settings(false));
    assert!(e.resize(0, 10).is_err());
    assert!(e.resize(70_000, 10).is_err());
    assert_eq!(e.canvas(), Canvas::new(32, 24).unwrap());

    e.resize(16, 8).unwrap();
    e.start();
    let frame = e.tick().unwrap().unwrap();
    assert_eq!((frame.width, frame.height), (16, 8));
}

#[test]
fn seek_and_render_are_deterministic() {
    let mut e = engine(settings(true));
    assert!(e.seek(f64::NAN).is_err());
    e.seek(2.5).unwrap();
    let a = e.render().unwrap().clone();
    e.seek(0.0).unwrap();
    e.render().unwrap();
    e.seek(2.5).unwrap();
    assert_eq!(&a, e.render().unwrap());
    assert_eq!(e.time(), 2.5);
}

#[test]
fn run_pushes_every_frame_then_stops() {
    let mut e = engine(settings(true));
    let mut sink = InMemorySink::new();
    e.run(3, &mut sink).unwrap();

    assert_eq!(e.state(), EngineState::Stopped);
    assert!(sink.is_finished());
    assert_eq!(sink.config().and_then(|c| c.frames), Some(3));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| *i).collect();
    assert_eq!(idx, vec![0, 1, 2]);
    assert!((e.time() - 0.048).abs() < 1e-12);
}

#[test]
fn invalid_surfaces_are_rejected() {
    let canvas = Canvas {
        width: 0,
        height: 10,
    };
    assert!(MoireEngine::new(canvas, Settings::default(), opts()).is_err());
}
