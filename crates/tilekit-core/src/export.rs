use crate::mesh::{FLOATS_PER_VERTEX, Mesh};
use crate::model::{Rect2D, Sprite};
use crate::pipeline::SceneOutput;
use serde_json::{Value, json};

fn rect_json(r: &Rect2D) -> Value {
    json!({"x0": r.start.x, "y0": r.start.y, "x1": r.end.x, "y1": r.end.y})
}

/// Serialize a sprite as `{ texture, pieces: [{ source, destination }] }`.
/// Rects are flattened to `{x0, y0, x1, y1}` for easy consumption outside Rust.
pub fn sprite_to_json(sprite: &Sprite) -> Value {
    let pieces: Vec<Value> = sprite
        .pieces
        .iter()
        .map(|p| {
            json!({
                "source": rect_json(&p.source),
                "destination": rect_json(&p.destination),
            })
        })
        .collect();
    json!({ "texture": sprite.texture.0, "pieces": pieces })
}

/// Serialize a mesh as `{ vertexCount, floatsPerVertex, vertices: [[x, y, z, u, v], ...] }`.
pub fn mesh_to_json(mesh: &Mesh) -> Value {
    let vertices: Vec<Value> = mesh
        .vertices()
        .iter()
        .map(|v| json!([v.position[0], v.position[1], v.position[2], v.uv[0], v.uv[1]]))
        .collect();
    json!({
        "vertexCount": mesh.vertex_count(),
        "floatsPerVertex": FLOATS_PER_VERTEX,
        "vertices": vertices,
    })
}

/// Serialize a built scene as `{ layers: [{ name, tiles, bounds, mesh }], stats }`.
pub fn scene_to_json(output: &SceneOutput) -> Value {
    let layers: Vec<Value> = output
        .layers
        .iter()
        .map(|l| {
            json!({
                "name": l.name,
                "tiles": l.tiles,
                "bounds": rect_json(&l.bounds),
                "mesh": mesh_to_json(&l.mesh),
            })
        })
        .collect();
    json!({ "layers": layers, "stats": output.stats() })
}
