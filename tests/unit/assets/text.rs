use super::*;

fn run(text: &str, family: &str) -> TextRun {
    TextRun {
        text: text.to_owned(),
        family: family.to_owned(),
        size: 48.0,
        letter_spacing: 0.0,
    }
}

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("moire_fonts_{tag}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn mapping_parses_family_and_path() {
    let (family, path) = FontBook::parse_mapping(" Georgia = /fonts/georgia.ttf").unwrap();
    assert_eq!(family, "Georgia");
    assert_eq!(path, PathBuf::from("/fonts/georgia.ttf"));
    assert!(FontBook::parse_mapping("Georgia").is_err());
    assert!(FontBook::parse_mapping("=x.ttf").is_err());
}

#[test]
fn explicit_mappings_are_case_insensitive() {
    let book = FontBook::new().with_font("Courier New", "/x/cour.ttf");
    assert_eq!(
        book.find_file("courier new"),
        Some(PathBuf::from("/x/cour.ttf"))
    );
    assert_eq!(book.find_file("Arial"), None);
}

#[test]
fn directories_prefer_the_bold_file() {
    let dir = temp_dir("dir");
    for name in ["Verdana.ttf", "Verdana-Bold.ttf", "Impact.otf", "notes.txt"] {
        std::fs::write(dir.join(name), b"not a font").unwrap();
    }
    let book = FontBook::new().with_dir(&dir);
    assert_eq!(book.find_file("verdana"), Some(dir.join("Verdana-Bold.ttf")));
    assert_eq!(book.find_file("Impact"), Some(dir.join("Impact.otf")));
    assert_eq!(book.find_file("notes"), None);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unresolvable_fonts_measure_zero() {
    let mut engine = TextLayoutEngine::new(FontBook::new());
    assert!(engine.shape(&run("MOIRE", "Arial")).is_none());
    assert_eq!(engine.measure(&run("MOIRE", "Arial")), 0.0);
}

#[test]
fn unreadable_font_files_are_skipped() {
    let dir = temp_dir("bad");
    std::fs::write(dir.join("Broken.ttf"), b"not a font").unwrap();
    let mut engine = TextLayoutEngine::new(FontBook::new().with_dir(&dir));
    assert!(engine.shape(&run("A", "Broken")).is_none());
    let mut engine =
        TextLayoutEngine::new(FontBook::new().with_font("Missing", dir.join("nope.ttf")));
    assert!(engine.shape(&run("A", "Missing")).is_none());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn empty_runs_are_not_shaped() {
    let mut engine = TextLayoutEngine::new(FontBook::new().with_system_fonts(true));
    assert!(engine.shape(&run("", "Arial")).is_none());
    let mut r = run("A", "Arial");
    r.size = 0.0;
    assert!(engine.shape(&r).is_none());
}

#[test]
fn system_fonts_shape_when_installed() {
    let mut engine = TextLayoutEngine::new(FontBook::new().with_system_fonts(true));
    let Some(short) = engine.shape(&run("MO", "Arial")) else {
        // No installed fonts on this machine.
        return;
    };
    let long = engine.shape(&run("MOIRE", "Arial")).unwrap();
    assert!(long.width > short.width);
    assert_eq!(long.glyphs.len(), 5);
    assert!((long.anchor.x + long.width / 2.0).abs() < 1e-9);

    let again = engine.shape(&run("MOIRE", "Arial")).unwrap();
    assert!(Arc::ptr_eq(&long, &again));

    let mut spaced = run("MOIRE", "Arial");
    spaced.letter_spacing = 4.0;
    let spaced = engine.shape(&spaced).unwrap();
    assert!(spaced.width > long.width);
}
