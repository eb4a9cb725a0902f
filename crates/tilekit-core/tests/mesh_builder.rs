use glam::{Vec2, Vec3};
use tilekit_core::mesh::{FLOATS_PER_VERTEX, MeshBuilder, Slope, VERTICES_PER_PIECE};
use tilekit_core::model::{Piece, Rect2D, Sprite, TextureChunk, TextureId, Tile8Connections};
use tilekit_core::provider::{MeshSink, MeshStore};
use tilekit_core::solvers::{solve_normal, solve_rpgmaker_a2};

fn quad(dst: Rect2D) -> Sprite {
    Sprite::with_pieces(
        TextureId(0),
        vec![Piece {
            source: Rect2D::UNIT,
            destination: dst,
        }],
    )
}

#[test]
fn empty_finish_is_empty_and_repeatable() {
    let mut b = MeshBuilder::new();
    assert!(b.finish().is_empty());
    assert_eq!(b.finish().vertex_count(), 0);
    assert!(b.is_empty());
}

#[test]
fn vertex_count_is_six_per_piece() {
    let chunk = TextureChunk::full(TextureId(0));
    let a2 = solve_rpgmaker_a2(&chunk, &Tile8Connections::all()).unwrap();
    let plain = solve_normal(&chunk, Vec2::ONE);
    let mut b = MeshBuilder::with_capacity(8);
    b.add_sprite(&a2, Vec3::ZERO);
    b.add_sprite(&plain, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(b.pending_vertices(), 5 * VERTICES_PER_PIECE);
    let mesh = b.finish();
    assert_eq!(mesh.vertex_count(), 30);
    assert_eq!(mesh.piece_count(), 5);
    assert_eq!(mesh.as_floats().len(), 30 * FLOATS_PER_VERTEX);
    assert_eq!(mesh.as_bytes().len(), 30 * FLOATS_PER_VERTEX * 4);
    assert!(b.is_empty());
}

#[test]
fn finish_resets_between_batches() {
    let mut b = MeshBuilder::new();
    b.add_sprite(&quad(Rect2D::UNIT), Vec3::ZERO);
    let first = b.finish();
    b.add_sprite(&quad(Rect2D::UNIT), Vec3::new(0.0, 5.0, 0.0));
    let second = b.finish();
    assert_eq!(first.vertex_count(), 6);
    assert_eq!(second.vertex_count(), 6);
    assert_eq!(second.vertices()[0].position, [0.0, 5.0, 0.0]);
}

#[test]
fn flat_mesh_keeps_offset_z() {
    let mut b = MeshBuilder::new();
    b.add_sprite(&quad(Rect2D::from_coords(0.0, 0.0, 3.0, 2.0)), Vec3::new(1.0, 1.0, 4.5));
    let mesh = b.finish();
    assert!(mesh.vertices().iter().all(|v| v.position[2] == 4.5));
    let xs: Vec<f32> = mesh.vertices().iter().map(|v| v.position[0]).collect();
    assert_eq!(xs, [1.0, 4.0, 1.0, 4.0, 4.0, 1.0]);
}

#[test]
fn uv_v_is_flipped_against_y() {
    let sprite = Sprite::with_pieces(
        TextureId(0),
        vec![Piece {
            source: Rect2D::from_coords(0.1, 0.2, 0.3, 0.4),
            destination: Rect2D::UNIT,
        }],
    );
    let mut b = MeshBuilder::new();
    b.add_sprite(&sprite, Vec3::ZERO);
    let mesh = b.finish();
    let v = mesh.vertices();
    // bottom-left samples the bottom of the region (larger V).
    assert_eq!(v[0].position, [0.0, 0.0, 0.0]);
    assert_eq!(v[0].uv, [0.1, 0.4]);
    // top-right samples the top.
    assert_eq!(v[4].position, [1.0, 1.0, 0.0]);
    assert_eq!(v[4].uv, [0.3, 0.2]);
}

#[test]
fn slope_raises_far_edges() {
    let mut b = MeshBuilder::new();
    let slope = Slope::new(0.5, 0.25);
    b.add_sprite_sloped(&quad(Rect2D::from_coords(0.0, 0.0, 2.0, 2.0)), Vec3::new(0.0, 0.0, 1.0), slope);
    let mesh = b.finish();
    let z: Vec<f32> = mesh.vertices().iter().map(|v| v.position[2]).collect();
    // bl, br, tl, br, tr, tl
    assert_eq!(z, [1.0, 1.5, 2.0, 1.5, 2.5, 2.0]);
}

#[test]
fn slope_clamps_each_axis() {
    let mut b = MeshBuilder::new();
    let slope = Slope::new(1.0, 1.0).clamped(0.0, 0.5);
    b.add_sprite_sloped(&quad(Rect2D::from_coords(0.0, 0.0, 4.0, 4.0)), Vec3::ZERO, slope);
    let mesh = b.finish();
    // top-right: x and y contributions are each capped at 0.5.
    assert_eq!(mesh.vertices()[4].position[2], 1.0);
    assert_eq!(mesh.vertices()[0].position[2], 0.0);
}

#[test]
fn finish_into_uploads_to_store() {
    let mut store = MeshStore::new();
    let mut b = MeshBuilder::new();
    b.add_sprite(&quad(Rect2D::UNIT), Vec3::ZERO);
    let a = b.finish_into(&mut store).unwrap();
    let empty = b.finish_into(&mut store).unwrap();
    assert_ne!(a, empty);
    assert_eq!(store.len(), 2);
    assert_eq!(store.total_vertices(), 6);
    assert!(store.get(empty).unwrap().is_empty());
    assert!(store.remove(a).is_some());
    assert!(store.get(a).is_none());
    let again = store.upload(Default::default()).unwrap();
    assert_ne!(again, a);
}
