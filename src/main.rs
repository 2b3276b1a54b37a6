use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use tilekit::{init_logging, Config, EditorSession, SessionScript, VERSION};

const VERSION_LINE: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// Replays a session script against a tile scene and reports the history.
#[derive(Parser, Debug)]
#[command(name = "tilekit", about = "Tile map undo/redo history engine", version = VERSION_LINE)]
struct Args {
    /// Settings file (TOML or JSON); defaults to the platform config dir.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Session script to replay.
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load_or_default(args.config.as_deref()).context("loading settings")?;
    init_logging(&config.logging)?;
    tracing::info!("TileKit {} starting", VERSION);

    let script = match &args.script {
        Some(path) => SessionScript::load(path)
            .with_context(|| format!("loading script {}", path.display()))?,
        None => SessionScript::default(),
    };

    let scene = script.scene.build(&config.editor)?;
    let mut session = EditorSession::new(scene, config.history);
    session.subscribe(|can_undo, can_redo| {
        tracing::debug!("History changed: can_undo={}, can_redo={}", can_undo, can_redo);
    });

    let report = script.replay(&mut session, &config.editor)?;
    tracing::info!(
        "Replayed {} step(s): {} edit(s), {} unchanged, {} undo, {} redo, {} ignored",
        report.steps,
        report.edits,
        report.unchanged,
        report.undone,
        report.redone,
        report.ignored
    );

    let status = session.status();
    tracing::info!(
        "History: {} undo / {} redo (can_undo={}, can_redo={})",
        status.undo_count,
        status.redo_count,
        status.can_undo,
        status.can_redo
    );
    if let Some(next) = session.history().undo_description() {
        tracing::info!("Next undo: {}", next);
    }

    let scene = session.scene();
    for layer in scene.layer_ids() {
        tracing::info!(
            "Scene '{}' layer {}: {} filled tile(s)",
            scene.name(),
            layer,
            scene.filled_count(layer)
        );
    }

    Ok(())
}
