use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("Invalid direction bitmask: {0:#06b}")]
    InvalidDirection(u8),
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown texture: {0}")]
    UnknownTexture(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Nothing to build")]
    Empty,
    #[error("layer '{layer}' tile {index}: {source}")]
    Tile {
        layer: String,
        index: usize,
        #[source]
        source: Box<SpriteError>,
    },
}

impl From<serde_json::Error> for SpriteError {
    fn from(e: serde_json::Error) -> Self {
        SpriteError::Serialize(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpriteError>;
