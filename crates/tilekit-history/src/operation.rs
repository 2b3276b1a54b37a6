//! Reversible scene operations.
//!
//! An [`Operation`] is plain data: the tile deltas it wrote (or the child
//! operations it bundles) plus a tag and a description. The scene is passed
//! in for each [`Operation::execute`] / [`Operation::undo`] call and is never
//! retained, so operations can be serialised and tested without a live scene.
//!
//! Applying an operation is all-or-nothing: if the scene rejects a write
//! part-way through, the writes already made are reverted before the error
//! is returned.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

use tilekit_core::{LayerId, SceneResult, TileCoord, TileScene, TileValue, EMPTY_TILE};

/// Opaque identity of a recorded operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(Uuid);

impl OperationId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Op({})", &self.0.to_string()[..8])
    }
}

/// Classification of an operation, used for diagnostics and UI labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    TilePaint,
    TileErase,
    Move,
    Delete,
    Paste,
    Fill,
    Composite,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TilePaint => write!(f, "Paint Tile"),
            Self::TileErase => write!(f, "Erase Tile"),
            Self::Move => write!(f, "Move Tiles"),
            Self::Delete => write!(f, "Delete Tiles"),
            Self::Paste => write!(f, "Paste Tiles"),
            Self::Fill => write!(f, "Fill"),
            Self::Composite => write!(f, "Group"),
        }
    }
}

/// Which way an operation is being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplyDirection {
    /// Re-apply the recorded change (redo).
    Forward,
    /// Apply the exact inverse (undo).
    Reverse,
}

impl ApplyDirection {
    pub fn inverse(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

impl fmt::Display for ApplyDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Reverse => write!(f, "reverse"),
        }
    }
}

/// Callback bound by the producing tool, run after the operation has
/// mutated the scene (typically schedules a re-render and autosave).
pub type ApplyHook = Rc<dyn Fn(ApplyDirection)>;

/// A single tile write: the value before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDelta {
    pub layer: LayerId,
    pub coord: TileCoord,
    pub old_value: TileValue,
    pub new_value: TileValue,
}

impl TileDelta {
    pub fn new(
        layer: impl Into<LayerId>,
        coord: TileCoord,
        old_value: TileValue,
        new_value: TileValue,
    ) -> Self {
        Self {
            layer: layer.into(),
            coord,
            old_value,
            new_value,
        }
    }

    /// Value this delta writes when applied in `direction`
    pub fn target(&self, direction: ApplyDirection) -> TileValue {
        match direction {
            ApplyDirection::Forward => self.new_value,
            ApplyDirection::Reverse => self.old_value,
        }
    }

    fn apply(&self, scene: &mut dyn TileScene, direction: ApplyDirection) -> SceneResult<()> {
        scene
            .set_tile(&self.layer, self.coord, self.target(direction))
            .map(|_| ())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum OperationBody {
    Tiles(Vec<TileDelta>),
    Composite(Vec<Operation>),
}

/// A reversible edit of the scene.
///
/// Deserialization rejects documents whose `kind` disagrees with the body,
/// and composites without children.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredOperation")]
pub struct Operation {
    id: OperationId,
    kind: OperationKind,
    description: String,
    body: OperationBody,
    #[serde(skip)]
    hook: Option<ApplyHook>,
}

#[derive(Deserialize)]
struct StoredOperation {
    id: OperationId,
    kind: OperationKind,
    description: String,
    body: OperationBody,
}

impl TryFrom<StoredOperation> for Operation {
    type Error = String;

    fn try_from(stored: StoredOperation) -> Result<Self, Self::Error> {
        match (&stored.kind, &stored.body) {
            (OperationKind::Composite, OperationBody::Composite(children))
                if children.is_empty() =>
            {
                return Err(format!("composite '{}' has no children", stored.description));
            }
            (OperationKind::Composite, OperationBody::Composite(_)) => {}
            (OperationKind::Composite, OperationBody::Tiles(_)) => {
                return Err(format!("composite '{}' has a tile body", stored.description));
            }
            (kind, OperationBody::Composite(_)) => {
                return Err(format!("{} '{}' has a composite body", kind, stored.description));
            }
            (_, OperationBody::Tiles(_)) => {}
        }

        Ok(Self {
            id: stored.id,
            kind: stored.kind,
            description: stored.description,
            body: stored.body,
            hook: None,
        })
    }
}

impl Operation {
    fn leaf(kind: OperationKind, description: String, deltas: Vec<TileDelta>) -> Self {
        Self {
            id: OperationId::new(),
            kind,
            description,
            body: OperationBody::Tiles(deltas),
            hook: None,
        }
    }

    /// Leaf operation of any tile kind. Returns `None` for
    /// [`OperationKind::Composite`], which only [`Operation::composite`] builds.
    pub fn from_deltas(
        kind: OperationKind,
        description: impl Into<String>,
        deltas: Vec<TileDelta>,
    ) -> Option<Self> {
        match kind {
            OperationKind::Composite => None,
            kind => Some(Self::leaf(kind, description.into(), deltas)),
        }
    }

    /// A single tile painted from `old_value` to `new_value`.
    pub fn tile_paint(
        layer: impl Into<LayerId>,
        coord: TileCoord,
        old_value: TileValue,
        new_value: TileValue,
    ) -> Self {
        let delta = TileDelta::new(layer, coord, old_value, new_value);
        let description = format!("Paint {} on {}", delta.coord, delta.layer);
        Self::leaf(OperationKind::TilePaint, description, vec![delta])
    }

    /// A single tile cleared from `old_value` to [`EMPTY_TILE`].
    pub fn tile_erase(layer: impl Into<LayerId>, coord: TileCoord, old_value: TileValue) -> Self {
        let delta = TileDelta::new(layer, coord, old_value, EMPTY_TILE);
        let description = format!("Erase {} on {}", delta.coord, delta.layer);
        Self::leaf(OperationKind::TileErase, description, vec![delta])
    }

    pub fn move_tiles(description: impl Into<String>, deltas: Vec<TileDelta>) -> Self {
        Self::leaf(OperationKind::Move, description.into(), deltas)
    }

    pub fn delete(description: impl Into<String>, deltas: Vec<TileDelta>) -> Self {
        Self::leaf(OperationKind::Delete, description.into(), deltas)
    }

    pub fn paste(description: impl Into<String>, deltas: Vec<TileDelta>) -> Self {
        Self::leaf(OperationKind::Paste, description.into(), deltas)
    }

    /// Many cells written atomically by one gesture (flood fill, rect fill).
    pub fn fill(description: impl Into<String>, deltas: Vec<TileDelta>) -> Self {
        Self::leaf(OperationKind::Fill, description.into(), deltas)
    }

    /// Bundles `children` into one operation. Returns `None` for an empty list.
    ///
    /// The composite executes children front-to-back and undoes them
    /// back-to-front.
    pub fn composite(children: Vec<Operation>, description: impl Into<String>) -> Option<Self> {
        if children.is_empty() {
            return None;
        }
        Some(Self {
            id: OperationId::new(),
            kind: OperationKind::Composite,
            description: description.into(),
            body: OperationBody::Composite(children),
            hook: None,
        })
    }

    /// Binds the render/save hook run after every apply.
    pub fn with_hook(mut self, hook: ApplyHook) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.body, OperationBody::Composite(_))
    }

    /// Tile deltas of a leaf operation (empty for composites)
    pub fn deltas(&self) -> &[TileDelta] {
        match &self.body {
            OperationBody::Tiles(deltas) => deltas,
            OperationBody::Composite(_) => &[],
        }
    }

    /// Children of a composite (empty for leaves)
    pub fn children(&self) -> &[Operation] {
        match &self.body {
            OperationBody::Tiles(_) => &[],
            OperationBody::Composite(children) => children,
        }
    }

    /// Number of deltas (leaf) or direct children (composite)
    pub fn len(&self) -> usize {
        match &self.body {
            OperationBody::Tiles(deltas) => deltas.len(),
            OperationBody::Composite(children) => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every distinct cell this operation touches, including nested children.
    pub fn affected_cells(&self) -> BTreeSet<(LayerId, TileCoord)> {
        let mut cells = BTreeSet::new();
        self.collect_cells(&mut cells);
        cells
    }

    fn collect_cells(&self, cells: &mut BTreeSet<(LayerId, TileCoord)>) {
        match &self.body {
            OperationBody::Tiles(deltas) => {
                cells.extend(deltas.iter().map(|d| (d.layer.clone(), d.coord)));
            }
            OperationBody::Composite(children) => {
                for child in children {
                    child.collect_cells(cells);
                }
            }
        }
    }

    /// Re-applies the change.
    pub fn execute(&self, scene: &mut dyn TileScene) -> SceneResult<()> {
        self.apply(scene, ApplyDirection::Forward)
    }

    /// Applies the exact inverse of the change.
    pub fn undo(&self, scene: &mut dyn TileScene) -> SceneResult<()> {
        self.apply(scene, ApplyDirection::Reverse)
    }

    pub fn apply(&self, scene: &mut dyn TileScene, direction: ApplyDirection) -> SceneResult<()> {
        match &self.body {
            OperationBody::Tiles(deltas) => {
                apply_in_order(deltas, scene, direction, |delta, scene, dir| {
                    delta.apply(scene, dir)
                })?;
            }
            OperationBody::Composite(children) => {
                apply_in_order(children, scene, direction, |child, scene, dir| {
                    child.apply(scene, dir)
                })?;
            }
        }
        if let Some(hook) = &self.hook {
            hook(direction);
        }
        Ok(())
    }
}

/// Applies `items` front-to-back (forward) or back-to-front (reverse).
///
/// On failure, the items already applied are reverted in the opposite
/// direction and order, then the original error is returned.
fn apply_in_order<T, F>(
    items: &[T],
    scene: &mut dyn TileScene,
    direction: ApplyDirection,
    apply: F,
) -> SceneResult<()>
where
    F: Fn(&T, &mut dyn TileScene, ApplyDirection) -> SceneResult<()>,
{
    let ordered: Vec<&T> = match direction {
        ApplyDirection::Forward => items.iter().collect(),
        ApplyDirection::Reverse => items.iter().rev().collect(),
    };

    for (done, &item) in ordered.iter().enumerate() {
        if let Err(err) = apply(item, &mut *scene, direction) {
            for &applied in ordered[..done].iter().rev() {
                if let Err(rollback_err) = apply(applied, &mut *scene, direction.inverse()) {
                    tracing::error!(
                        "Rollback after failed {} apply also failed: {}",
                        direction,
                        rollback_err
                    );
                }
            }
            return Err(err);
        }
    }
    Ok(())
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("description", &self.description)
            .field("body", &self.body)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}
