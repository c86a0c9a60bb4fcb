use super::*;
use crate::draw::list::DrawOp;

fn run(text: &str, spacing: f64) -> Arc<TextRun> {
    Arc::new(TextRun {
        text: text.to_owned(),
        family: "Arial".to_owned(),
        size: 100.0,
        letter_spacing: spacing,
    })
}

#[test]
fn fixed_advance_counts_characters_and_spacing() {
    let mut m = FixedAdvance::default();
    assert_eq!(m.measure(&run("MOIRE", 0.0)), 300.0);
    assert_eq!(m.measure(&run("MOIRE", 2.0)), 310.0);
    assert_eq!(m.measure(&run("", 2.0)), 0.0);
}

#[test]
fn grid_cells_add_spacing_per_character() {
    let r = run("ABCD", 5.0);
    let grid = TextGrid::for_run(&r, 200.0, 3, 2);
    assert_eq!(grid.cell_width, 220.0);
    assert_eq!(grid.cell_height, 120.0);
}

#[test]
fn cell_offsets_are_centered() {
    let grid = TextGrid {
        repeat_x: 3,
        repeat_y: 2,
        cell_width: 100.0,
        cell_height: 50.0,
    };
    assert_eq!(grid.cell_offset(0, 0), Vec2::new(-100.0, -25.0));
    assert_eq!(grid.cell_offset(1, 1), Vec2::new(0.0, 25.0));
    assert_eq!(grid.cell_offset(2, 0), Vec2::new(100.0, -25.0));
}

#[test]
fn text_grid_emits_one_copy_per_cell() {
    let r = run("HI", 0.0);
    let grid = TextGrid {
        repeat_x: 2,
        repeat_y: 3,
        cell_width: 10.0,
        cell_height: 20.0,
    };
    let mut list = DrawList::new();
    draw_text_grid(&mut list, &r, &grid, Point::new(50.0, 50.0));
    assert_eq!(list.ops().len(), 6);
    let DrawOp::Text { transform, .. } = &list.ops()[0] else {
        panic!("expected text");
    };
    assert_eq!(transform.translation(), Vec2::new(45.0, 30.0));
}

#[test]
fn empty_text_or_grid_draws_nothing() {
    let grid = TextGrid {
        repeat_x: 0,
        repeat_y: 3,
        cell_width: 10.0,
        cell_height: 20.0,
    };
    let mut list = DrawList::new();
    draw_text_grid(&mut list, &run("HI", 0.0), &grid, Point::ORIGIN);
    let grid = TextGrid { repeat_x: 2, ..grid };
    draw_text_grid(&mut list, &run("", 0.0), &grid, Point::ORIGIN);
    assert!(list.is_empty());
}
