//! Editor session: one scene plus its edit history.
//!
//! The session is the minimal tool adapter for the history engine. Each
//! paint/erase writes the scene first and then records the matching
//! operation, so the history always describes changes that already happened.
//! Switching scenes clears the history before the old scene is dropped.

use std::fmt;

use tilekit_core::{LayerId, Result, Scene, TileCoord, TileScene, TileValue, EMPTY_TILE};
use tilekit_history::{
    ApplyDirection, ApplyHook, HistoryConfig, HistoryManager, HistoryStatus, Operation,
    SubscriptionId,
};
use tilekit_settings::Config;

/// Scene and history owned together for the lifetime of an editor session
pub struct EditorSession {
    scene: Scene,
    history: HistoryManager,
    render_hook: Option<ApplyHook>,
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("scene", &self.scene)
            .field("history", &self.history)
            .field("render_hook", &self.render_hook.is_some())
            .finish()
    }
}

impl EditorSession {
    pub fn new(scene: Scene, config: HistoryConfig) -> Self {
        Self {
            scene,
            history: HistoryManager::new(config),
            render_hook: None,
        }
    }

    /// Opens a blank scene sized and layered from the editor settings.
    pub fn from_settings(config: &Config) -> Result<Self> {
        let editor = &config.editor;
        let scene = Scene::with_layers(
            "untitled",
            editor.scene_width,
            editor.scene_height,
            editor.layers.iter().map(String::as_str),
        )?;
        Ok(Self::new(scene, config.history))
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn status(&self) -> HistoryStatus {
        self.history.status()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(bool, bool) + 'static,
    {
        self.history.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.history.unsubscribe(id)
    }

    /// Render/save trigger bound into every operation this session records.
    pub fn set_render_hook(&mut self, hook: ApplyHook) {
        self.render_hook = Some(hook);
    }

    /// Gesture start: edits until [`EditorSession::end_stroke`] undo as one.
    pub fn begin_stroke(&mut self, description: impl Into<String>) {
        self.history.begin_group(description);
    }

    pub fn end_stroke(&mut self) -> bool {
        self.history.end_group()
    }

    /// Paints one tile. Returns false (and records nothing) if the tile
    /// already holds `value`.
    pub fn paint(&mut self, layer: &LayerId, coord: TileCoord, value: TileValue) -> Result<bool> {
        let old = self.scene.tile(layer, coord)?;
        if old == value {
            return Ok(false);
        }
        self.scene.set_tile(layer, coord, value)?;
        let operation = Operation::tile_paint(layer.clone(), coord, old, value);
        self.record(operation);
        Ok(true)
    }

    /// Clears one tile. Returns false if it was already empty.
    pub fn erase(&mut self, layer: &LayerId, coord: TileCoord) -> Result<bool> {
        let old = self.scene.tile(layer, coord)?;
        if old == EMPTY_TILE {
            return Ok(false);
        }
        self.scene.set_tile(layer, coord, EMPTY_TILE)?;
        let operation = Operation::tile_erase(layer.clone(), coord, old);
        self.record(operation);
        Ok(true)
    }

    fn record(&mut self, operation: Operation) {
        let operation = match &self.render_hook {
            Some(hook) => {
                hook(ApplyDirection::Forward);
                operation.with_hook(hook.clone())
            }
            None => operation,
        };
        self.history.push(operation);
    }

    pub fn undo(&mut self) -> Result<bool> {
        Ok(self.history.undo(&mut self.scene)?)
    }

    pub fn redo(&mut self) -> Result<bool> {
        Ok(self.history.redo(&mut self.scene)?)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Replaces the scene, returning the previous one. History is cleared
    /// first so no entry outlives the scene it was recorded against.
    pub fn switch_scene(&mut self, scene: Scene) -> Scene {
        tracing::info!(
            "Switching scene '{}' -> '{}'",
            self.scene.name(),
            scene.name()
        );
        self.history.clear();
        std::mem::replace(&mut self.scene, scene)
    }
}
