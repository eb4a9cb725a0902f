use crate::error::{Result, SpriteError};
use crate::mesh::Mesh;
use crate::model::{PixelRect, Rect2D, TextureChunk, TextureId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;

/// Receiver of finished meshes (typically a GPU upload layer).
///
/// Implementations own whatever storage the mesh ends up in and return a handle for it.
pub trait MeshSink {
    type Handle;
    type Error;
    fn upload(&mut self, mesh: Mesh) -> std::result::Result<Self::Handle, Self::Error>;
}

/// Handle into a [`MeshStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshId(pub usize);

/// In-memory mesh sink; keeps every uploaded mesh until removed.
#[derive(Debug, Default)]
pub struct MeshStore {
    meshes: Vec<Option<Mesh>>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0).and_then(|m| m.as_ref())
    }

    /// Removes the mesh; the id is not reused.
    pub fn remove(&mut self, id: MeshId) -> Option<Mesh> {
        self.meshes.get_mut(id.0).and_then(|m| m.take())
    }

    pub fn len(&self) -> usize {
        self.meshes.iter().filter(|m| m.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_vertices(&self) -> usize {
        self.meshes.iter().flatten().map(Mesh::vertex_count).sum()
    }
}

impl MeshSink for MeshStore {
    type Handle = MeshId;
    type Error = Infallible;

    fn upload(&mut self, mesh: Mesh) -> std::result::Result<MeshId, Infallible> {
        self.meshes.push(Some(mesh));
        Ok(MeshId(self.meshes.len() - 1))
    }
}

/// Named atlas known to the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextureDesc {
    pub name: String,
    /// Pixel width; only needed to resolve pixel-space chunks.
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// How a scene addresses a region of an atlas.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ChunkDesc {
    #[default]
    Full,
    Uv(Rect2D),
    Pixels(PixelRect),
}

/// Maps atlas names to [`TextureId`]s. Owns no pixel data.
#[derive(Debug, Default, Clone)]
pub struct TextureRegistry {
    textures: Vec<TextureDesc>,
    by_name: HashMap<String, TextureId>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an atlas, or returns the existing id if the name is already known.
    pub fn register(&mut self, desc: TextureDesc) -> TextureId {
        if let Some(id) = self.by_name.get(&desc.name) {
            return *id;
        }
        let id = TextureId(self.textures.len() as u32);
        self.by_name.insert(desc.name.clone(), id);
        self.textures.push(desc);
        id
    }

    pub fn id(&self, name: &str) -> Result<TextureId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SpriteError::UnknownTexture(name.to_string()))
    }

    pub fn desc(&self, id: TextureId) -> Option<&TextureDesc> {
        self.textures.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolves a chunk description against a named atlas.
    pub fn chunk(&self, name: &str, desc: &ChunkDesc) -> Result<TextureChunk> {
        let id = self.id(name)?;
        match desc {
            ChunkDesc::Full => Ok(TextureChunk::full(id)),
            ChunkDesc::Uv(rect) => Ok(TextureChunk::new(id, *rect)),
            ChunkDesc::Pixels(px) => {
                let tex = &self.textures[id.0 as usize];
                TextureChunk::from_pixels(id, *px, tex.width, tex.height)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshBuilder;
    use glam::{Vec2, Vec3};

    fn tex(name: &str, w: u32, h: u32) -> TextureDesc {
        TextureDesc {
            name: name.into(),
            width: w,
            height: h,
        }
    }

    #[test]
    fn register_is_idempotent_per_name() {
        let mut reg = TextureRegistry::new();
        let a = reg.register(tex("tiles", 64, 64));
        let b = reg.register(tex("duck", 256, 32));
        assert_ne!(a, b);
        assert_eq!(reg.register(tex("tiles", 1, 1)), a);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.desc(a).unwrap().width, 64);
    }

    #[test]
    fn pixel_chunks_need_dimensions() {
        let mut reg = TextureRegistry::new();
        reg.register(tex("sized", 64, 32));
        reg.register(tex("unsized", 0, 0));
        let px = ChunkDesc::Pixels(PixelRect::new(0, 0, 32, 16));
        let c = reg.chunk("sized", &px).unwrap();
        assert_eq!(c.rect.end, Vec2::new(0.5, 0.5));
        assert!(matches!(reg.chunk("unsized", &px), Err(SpriteError::InvalidInput(_))));
        assert!(matches!(
            reg.chunk("missing", &ChunkDesc::Full),
            Err(SpriteError::UnknownTexture(_))
        ));
    }

    #[test]
    fn store_hands_out_stable_ids() {
        let mut store = MeshStore::new();
        let mut b = MeshBuilder::new();
        let spr = crate::solvers::solve_normal(&TextureChunk::full(TextureId(0)), Vec2::ONE);
        b.add_sprite(&spr, Vec3::ZERO);
        let first = b.finish_into(&mut store).unwrap();
        let second = b.finish_into(&mut store).unwrap();
        assert_eq!(store.get(first).unwrap().vertex_count(), 6);
        assert!(store.get(second).unwrap().is_empty());
        assert_eq!(store.total_vertices(), 6);
        assert!(store.remove(first).is_some());
        assert!(store.get(first).is_none());
        assert_eq!(store.len(), 1);
    }
}
