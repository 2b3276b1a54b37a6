//! Scene primitives
//!
//! A scene is a fixed-size grid of tiles split into named layers
//! (ground, props, collision, triggers, ...). Tools and recorded operations
//! address cells through the [`TileScene`] trait, which keeps the history
//! engine independent from the concrete scene storage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{SceneError, SceneResult};

/// Value stored in a single tile cell.
pub type TileValue = u32;

/// Tile value meaning "nothing here".
pub const EMPTY_TILE: TileValue = 0;

/// Layer names every new editor scene starts with.
pub const DEFAULT_LAYERS: [&str; 4] = ["ground", "props", "collision", "triggers"];

/// Name of a layer within a scene
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for LayerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Column/row address of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Tile-level access to a scene.
///
/// Operations borrow a `TileScene` only for the duration of a single
/// execute/undo call and never keep a handle to it.
pub trait TileScene {
    /// Reads the value of a tile.
    fn tile(&self, layer: &LayerId, coord: TileCoord) -> SceneResult<TileValue>;

    /// Writes a tile and returns the value it replaced.
    fn set_tile(
        &mut self,
        layer: &LayerId,
        coord: TileCoord,
        value: TileValue,
    ) -> SceneResult<TileValue>;
}

/// In-memory layered tile map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    name: String,
    width: u32,
    height: u32,
    layers: BTreeMap<LayerId, Vec<TileValue>>,
}

impl Scene {
    /// Creates an empty scene with no layers.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> SceneResult<Self> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidDimensions { width, height });
        }
        Ok(Self {
            name: name.into(),
            width,
            height,
            layers: BTreeMap::new(),
        })
    }

    /// Creates a scene with the given layers, all cells empty.
    pub fn with_layers<I, L>(
        name: impl Into<String>,
        width: u32,
        height: u32,
        layers: I,
    ) -> SceneResult<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<LayerId>,
    {
        let mut scene = Self::new(name, width, height)?;
        for layer in layers {
            scene.add_layer(layer);
        }
        Ok(scene)
    }

    /// Creates a scene with [`DEFAULT_LAYERS`].
    pub fn with_default_layers(
        name: impl Into<String>,
        width: u32,
        height: u32,
    ) -> SceneResult<Self> {
        Self::with_layers(name, width, height, DEFAULT_LAYERS)
    }

    /// Adds an empty layer. Returns false if the layer already exists.
    pub fn add_layer(&mut self, layer: impl Into<LayerId>) -> bool {
        let layer = layer.into();
        if self.layers.contains_key(&layer) {
            return false;
        }
        tracing::debug!("Scene '{}': added layer {}", self.name, layer);
        let cells = (self.width as usize) * (self.height as usize);
        self.layers.insert(layer, vec![EMPTY_TILE; cells]);
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_layer(&self, layer: &LayerId) -> bool {
        self.layers.contains_key(layer)
    }

    /// Layer names in sorted order
    pub fn layer_ids(&self) -> impl Iterator<Item = &LayerId> {
        self.layers.keys()
    }

    /// Row-major cells of a layer
    pub fn layer_tiles(&self, layer: &LayerId) -> Option<&[TileValue]> {
        self.layers.get(layer).map(Vec::as_slice)
    }

    /// Number of non-empty cells on a layer (0 for unknown layers)
    pub fn filled_count(&self, layer: &LayerId) -> usize {
        self.layers
            .get(layer)
            .map(|cells| cells.iter().filter(|v| **v != EMPTY_TILE).count())
            .unwrap_or(0)
    }

    fn index(&self, coord: TileCoord) -> SceneResult<usize> {
        if coord.x >= self.width || coord.y >= self.height {
            return Err(SceneError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((coord.y as usize) * (self.width as usize) + coord.x as usize)
    }
}

impl TileScene for Scene {
    fn tile(&self, layer: &LayerId, coord: TileCoord) -> SceneResult<TileValue> {
        let index = self.index(coord)?;
        let cells = self.layers.get(layer).ok_or_else(|| SceneError::UnknownLayer {
            layer: layer.to_string(),
        })?;
        Ok(cells[index])
    }

    fn set_tile(
        &mut self,
        layer: &LayerId,
        coord: TileCoord,
        value: TileValue,
    ) -> SceneResult<TileValue> {
        let index = self.index(coord)?;
        let cells = self
            .layers
            .get_mut(layer)
            .ok_or_else(|| SceneError::UnknownLayer {
                layer: layer.to_string(),
            })?;
        Ok(std::mem::replace(&mut cells[index], value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_rejects_zero_dimensions() {
        assert_eq!(
            Scene::new("empty", 0, 4),
            Err(SceneError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
    }

    #[test]
    fn test_default_layers() {
        let scene = Scene::with_default_layers("level", 4, 3).unwrap();
        let names: Vec<&str> = scene.layer_ids().map(LayerId::as_str).collect();
        assert_eq!(names, vec!["collision", "ground", "props", "triggers"]);
        assert_eq!(scene.layer_tiles(&"ground".into()).unwrap().len(), 12);
    }

    #[test]
    fn test_set_tile_returns_previous() {
        let mut scene = Scene::with_layers("level", 4, 4, ["ground"]).unwrap();
        let ground = LayerId::new("ground");
        let at = TileCoord::new(1, 2);

        assert_eq!(scene.set_tile(&ground, at, 7).unwrap(), EMPTY_TILE);
        assert_eq!(scene.set_tile(&ground, at, 9).unwrap(), 7);
        assert_eq!(scene.tile(&ground, at).unwrap(), 9);
        assert_eq!(scene.filled_count(&ground), 1);
    }

    #[test]
    fn test_unknown_layer_and_bounds() {
        let mut scene = Scene::with_layers("level", 2, 2, ["ground"]).unwrap();

        let err = scene
            .set_tile(&"props".into(), TileCoord::new(0, 0), 1)
            .unwrap_err();
        assert!(matches!(err, SceneError::UnknownLayer { .. }));

        let err = scene.tile(&"ground".into(), TileCoord::new(2, 0)).unwrap_err();
        assert!(matches!(err, SceneError::OutOfBounds { x: 2, y: 0, .. }));
    }

    #[test]
    fn test_add_layer_twice() {
        let mut scene = Scene::new("level", 2, 2).unwrap();
        assert!(scene.add_layer("props"));
        assert!(!scene.add_layer("props"));
    }

    #[test]
    fn test_layer_id_serializes_as_string() {
        let json = serde_json::to_string(&LayerId::new("collision")).unwrap();
        assert_eq!(json, "\"collision\"");
    }
}
