use glam::Vec2;
use tilekit_core::config::{CardinalPriority, FrameLayout, SolverConfig};
use tilekit_core::direction::Direction;
use tilekit_core::error::SpriteError;
use tilekit_core::model::{Rect2D, TextureChunk, TextureId};
use tilekit_core::solvers::{
    TileSolver, solve_4_directional, solve_4_directional_with, solve_8_directional,
    solve_8_directional_with, solve_normal,
};

const EPS: f32 = 1e-6;

fn approx_rect(a: &Rect2D, b: &Rect2D) -> bool {
    a.start.abs_diff_eq(b.start, EPS) && a.end.abs_diff_eq(b.end, EPS)
}

fn chunk(x0: f32, y0: f32, x1: f32, y1: f32) -> TextureChunk {
    TextureChunk::new(TextureId(7), Rect2D::from_coords(x0, y0, x1, y1))
}

#[test]
fn normal_copies_chunk_to_target() {
    let c = chunk(0.25, 0.5, 0.5, 0.75);
    let s = solve_normal(&c, Vec2::new(2.0, 3.0));
    assert_eq!(s.texture, TextureId(7));
    assert_eq!(s.pieces.len(), 1);
    assert_eq!(s.pieces[0].source, c.rect);
    assert_eq!(
        s.pieces[0].destination,
        Rect2D::from_coords(0.0, 0.0, 2.0, 3.0)
    );
}

#[test]
fn eight_way_horizontal_strip() {
    let c = chunk(0.0, 0.0, 1.0, 0.125);
    for (i, dir) in Direction::CANONICAL.iter().enumerate() {
        let s = solve_8_directional(&c, *dir, Vec2::ONE).unwrap();
        let expect = Rect2D::from_coords(i as f32 / 8.0, 0.0, (i + 1) as f32 / 8.0, 0.125);
        assert!(
            approx_rect(&s.pieces[0].source, &expect),
            "{}: {:?}",
            dir,
            s.pieces[0].source
        );
        assert_eq!(s.pieces[0].destination, Rect2D::UNIT);
    }
}

#[test]
fn eight_way_vertical_strip() {
    let c = chunk(0.5, 0.0, 0.625, 1.0);
    let s = solve_8_directional(&c, Direction::UP, Vec2::ONE).unwrap();
    let expect = Rect2D::from_coords(0.5, 0.5, 0.625, 0.625);
    assert!(approx_rect(&s.pieces[0].source, &expect));
}

#[test]
fn square_chunk_slices_horizontally() {
    let c = chunk(0.0, 0.0, 0.5, 0.5);
    let s = solve_4_directional(&c, Direction::RIGHT, Vec2::ONE).unwrap();
    let expect = Rect2D::from_coords(0.125, 0.0, 0.25, 0.5);
    assert!(approx_rect(&s.pieces[0].source, &expect));
}

#[test]
fn forced_layout_overrides_detection() {
    let c = chunk(0.0, 0.0, 1.0, 1.0);
    let cfg = SolverConfig::builder().layout(FrameLayout::Vertical).build();
    let s = solve_8_directional_with(&c, Direction::RIGHT, Vec2::ONE, &cfg).unwrap();
    let expect = Rect2D::from_coords(0.0, 0.25, 1.0, 0.375);
    assert!(approx_rect(&s.pieces[0].source, &expect));
}

#[test]
fn four_way_diagonals_follow_priority() {
    let c = chunk(0.0, 0.0, 1.0, 0.25);
    let up = solve_4_directional(&c, Direction::UP, Vec2::ONE).unwrap();
    let up_left = solve_4_directional(&c, Direction::UP_LEFT, Vec2::ONE).unwrap();
    assert_eq!(up.pieces, up_left.pieces);

    let cfg = SolverConfig::builder()
        .priority(CardinalPriority::HorizontalFirst)
        .build();
    let left = solve_4_directional(&c, Direction::LEFT, Vec2::ONE).unwrap();
    let up_left_h = solve_4_directional_with(&c, Direction::UP_LEFT, Vec2::ONE, &cfg).unwrap();
    assert_eq!(left.pieces, up_left_h.pieces);
    assert!(approx_rect(
        &left.pieces[0].source,
        &Rect2D::from_coords(0.75, 0.0, 1.0, 0.25)
    ));
}

#[test]
fn invalid_directions_are_errors() {
    let c = chunk(0.0, 0.0, 1.0, 0.25);
    let bad = Direction::UP | Direction::DOWN;
    assert!(matches!(
        solve_8_directional(&c, bad, Vec2::ONE),
        Err(SpriteError::InvalidDirection(0b0011))
    ));
    assert!(matches!(
        solve_4_directional(&c, Direction::NONE, Vec2::ONE),
        Err(SpriteError::InvalidDirection(0))
    ));
}

#[test]
fn degenerate_chunks_are_errors() {
    let flat = chunk(0.0, 0.5, 1.0, 0.5);
    assert!(matches!(
        solve_8_directional(&flat, Direction::DOWN, Vec2::ONE),
        Err(SpriteError::DegenerateGeometry(_))
    ));
    let nan = chunk(0.0, 0.0, f32::NAN, 1.0);
    assert!(matches!(
        solve_4_directional(&nan, Direction::DOWN, Vec2::ONE),
        Err(SpriteError::DegenerateGeometry(_))
    ));
    // Plain copy doesn't care.
    assert_eq!(solve_normal(&flat, Vec2::ONE).pieces.len(), 1);
}

#[test]
fn tile_solver_dispatch_from_json() {
    let c = chunk(0.0, 0.0, 1.0, 0.125);
    let cfg = SolverConfig::default();
    let solver: TileSolver =
        serde_json::from_str(r#"{"kind": "directional8", "direction": "left"}"#).unwrap();
    assert_eq!(solver.name(), "directional8");
    let s = solver.solve(&c, &cfg).unwrap();
    assert_eq!(
        s,
        solve_8_directional(&c, Direction::LEFT, Vec2::ONE).unwrap()
    );

    let normal: TileSolver =
        serde_json::from_str(r#"{"kind": "normal", "target_size": [2.0, 1.0]}"#).unwrap();
    let s = normal.solve(&c, &cfg).unwrap();
    assert_eq!(s.pieces[0].destination.end, Vec2::new(2.0, 1.0));

    let bad = serde_json::from_str::<TileSolver>(r#"{"kind": "directional4", "direction": "up_down"}"#);
    assert!(bad.is_err());
}
