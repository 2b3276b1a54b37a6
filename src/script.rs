//! Session scripts: recorded editor gestures replayed against a session.
//!
//! A script is a JSON document holding an optional scene description and a
//! list of steps. Steps are tagged by `op`:
//!
//! ```json
//! {
//!   "scene": { "name": "demo", "width": 8, "height": 8 },
//!   "steps": [
//!     { "op": "begin_group", "description": "Brush stroke" },
//!     { "op": "paint", "layer": "ground", "x": 0, "y": 0, "value": 3 },
//!     { "op": "end_group" },
//!     { "op": "undo" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use tilekit_core::{Result, Scene, TileCoord, TileValue};
use tilekit_settings::EditorSettings;

use crate::session::EditorSession;

/// Scene to open; missing fields fall back to the editor settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneTemplate {
    pub name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub layers: Option<Vec<String>>,
}

impl SceneTemplate {
    pub fn build(&self, defaults: &EditorSettings) -> Result<Scene> {
        let layers = self.layers.as_ref().unwrap_or(&defaults.layers);
        let scene = Scene::with_layers(
            self.name.as_deref().unwrap_or("untitled"),
            self.width.unwrap_or(defaults.scene_width),
            self.height.unwrap_or(defaults.scene_height),
            layers.iter().map(String::as_str),
        )?;
        Ok(scene)
    }
}

/// One recorded gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    BeginGroup {
        description: String,
    },
    EndGroup,
    Paint {
        layer: String,
        x: u32,
        y: u32,
        value: TileValue,
    },
    Erase {
        layer: String,
        x: u32,
        y: u32,
    },
    Undo,
    Redo,
    Clear,
    SwitchScene {
        #[serde(default)]
        scene: SceneTemplate,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionScript {
    pub scene: SceneTemplate,
    pub steps: Vec<ScriptStep>,
}

/// Counters gathered while replaying a script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: usize,
    /// Paint/erase steps that changed a tile
    pub edits: usize,
    /// Paint/erase steps that left the tile as it was
    pub unchanged: usize,
    pub undone: usize,
    pub redone: usize,
    /// Undo/redo steps with nothing to apply
    pub ignored: usize,
    pub groups_committed: usize,
}

impl SessionScript {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let script = Self::from_json(&content)?;
        tracing::debug!(
            "Loaded script {} ({} steps)",
            path.display(),
            script.steps.len()
        );
        Ok(script)
    }

    /// Runs every step in order. The first failing step aborts the replay;
    /// steps already applied stay applied.
    pub fn replay(
        &self,
        session: &mut EditorSession,
        defaults: &EditorSettings,
    ) -> Result<ReplayReport> {
        let mut report = ReplayReport::default();

        for (index, step) in self.steps.iter().enumerate() {
            tracing::trace!("Step {}: {:?}", index, step);
            apply_step(step, session, defaults, &mut report).map_err(|e| {
                tracing::warn!("Step {} ({:?}) failed: {}", index, step, e);
                e.at_step(index)
            })?;
            report.steps += 1;
        }

        if session.history().is_grouping() {
            tracing::warn!(
                "Script ended with {} open group(s)",
                session.history().group_depth()
            );
        }
        Ok(report)
    }
}

fn apply_step(
    step: &ScriptStep,
    session: &mut EditorSession,
    defaults: &EditorSettings,
    report: &mut ReplayReport,
) -> Result<()> {
    match step {
        ScriptStep::BeginGroup { description } => session.begin_stroke(description.as_str()),
        ScriptStep::EndGroup => {
            if session.end_stroke() {
                report.groups_committed += 1;
            }
        }
        ScriptStep::Paint { layer, x, y, value } => {
            let changed = session.paint(&layer.as_str().into(), TileCoord::new(*x, *y), *value)?;
            count_edit(report, changed);
        }
        ScriptStep::Erase { layer, x, y } => {
            let changed = session.erase(&layer.as_str().into(), TileCoord::new(*x, *y))?;
            count_edit(report, changed);
        }
        ScriptStep::Undo => match session.undo()? {
            true => report.undone += 1,
            false => report.ignored += 1,
        },
        ScriptStep::Redo => match session.redo()? {
            true => report.redone += 1,
            false => report.ignored += 1,
        },
        ScriptStep::Clear => session.clear_history(),
        ScriptStep::SwitchScene { scene } => {
            session.switch_scene(scene.build(defaults)?);
        }
    }
    Ok(())
}

fn count_edit(report: &mut ReplayReport, changed: bool) {
    if changed {
        report.edits += 1;
    } else {
        report.unchanged += 1;
    }
}
