use std::cell::RefCell;
use std::rc::Rc;

use tilekit_core::{shared_vec, LayerId, Scene, TileCoord, TileScene};
use tilekit_history::{ApplyDirection, HistoryConfig, HistoryManager, Operation};

#[test]
fn test_paint_stroke_across_five_tiles() {
    let mut scene = Scene::with_default_layers("meadow", 10, 10).unwrap();
    let ground = LayerId::new("ground");
    for x in 0..5 {
        scene.set_tile(&ground, TileCoord::new(x, 4), 2).unwrap();
    }
    let before = scene.clone();

    let mut history = HistoryManager::default();
    history.begin_group("paint");
    for x in 0..5 {
        let at = TileCoord::new(x, 4);
        let old = scene.set_tile(&ground, at, 11).unwrap();
        history.push(Operation::tile_paint(ground.clone(), at, old, 11));
    }
    history.end_group();
    assert_eq!(history.undo_count(), 1);

    assert_eq!(history.undo(&mut scene), Ok(true));
    assert_eq!(scene, before);

    assert_eq!(history.redo(&mut scene), Ok(true));
    for x in 0..5 {
        assert_eq!(scene.tile(&ground, TileCoord::new(x, 4)).unwrap(), 11);
    }
}

#[test]
fn test_erase_then_undo_redo() {
    let mut scene = Scene::with_default_layers("cave", 4, 4).unwrap();
    let props = LayerId::new("props");
    let at = TileCoord::new(1, 3);
    scene.set_tile(&props, at, 3).unwrap();

    let mut history = HistoryManager::default();
    let old = scene.set_tile(&props, at, 0).unwrap();
    history.push(Operation::tile_erase(props.clone(), at, old));

    history.undo(&mut scene).unwrap();
    assert_eq!(scene.tile(&props, at).unwrap(), 3);

    history.redo(&mut scene).unwrap();
    assert_eq!(scene.tile(&props, at).unwrap(), 0);
}

#[test]
fn test_render_hook_fires_on_undo_and_redo() {
    let mut scene = Scene::with_default_layers("town", 4, 4).unwrap();
    let renders = Rc::new(RefCell::new(Vec::new()));
    let probe = renders.clone();
    let hook = Rc::new(move |dir: ApplyDirection| probe.borrow_mut().push(dir));

    let mut history = HistoryManager::default();
    let at = TileCoord::new(0, 0);
    let old = scene.set_tile(&"collision".into(), at, 1).unwrap();
    history.push(Operation::tile_paint("collision", at, old, 1).with_hook(hook));

    history.undo(&mut scene).unwrap();
    history.redo(&mut scene).unwrap();

    assert_eq!(
        *renders.borrow(),
        vec![ApplyDirection::Reverse, ApplyDirection::Forward]
    );
}

#[test]
fn test_toolbar_and_shortcuts_both_notified() {
    let toolbar = shared_vec::<(bool, bool)>();
    let shortcuts = shared_vec::<(bool, bool)>();

    let t = toolbar.clone();
    let mut history = HistoryManager::with_listener(HistoryConfig::default(), move |u, r| {
        t.borrow_mut().push((u, r))
    });
    let s = shortcuts.clone();
    let shortcut_sub = history.subscribe(move |u, r| s.borrow_mut().push((u, r)));

    history.push(Operation::fill("fill", Vec::new()));
    assert!(history.unsubscribe(shortcut_sub));
    history.clear();

    assert_eq!(*toolbar.borrow(), vec![(true, false), (false, false)]);
    assert_eq!(*shortcuts.borrow(), vec![(true, false)]);
}

#[test]
fn test_scene_switch_clears_everything() {
    let mut history = HistoryManager::default();
    history.push(Operation::tile_paint("ground", TileCoord::new(0, 0), 0, 1));
    history.begin_group("unfinished drag");
    history.push(Operation::tile_paint("ground", TileCoord::new(1, 0), 0, 1));

    history.clear();

    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.group_depth(), 0);
    history.push(Operation::tile_paint("ground", TileCoord::new(2, 0), 0, 1));
    assert_eq!(history.undo_count(), 1);
}

#[test]
fn test_failed_undo_keeps_entry_and_scene() {
    let mut scene = Scene::with_layers("small", 4, 4, ["ground"]).unwrap();
    let mut history = HistoryManager::default();
    history.push(Operation::fill(
        "fill",
        vec![
            tilekit_history::TileDelta::new("ground", TileCoord::new(0, 0), 0, 4),
            tilekit_history::TileDelta::new("ground", TileCoord::new(5, 5), 0, 4),
        ],
    ));

    // Undo fails on the out-of-bounds cell and leaves the in-bounds cell alone.
    assert!(history.undo(&mut scene).is_err());
    assert_eq!(history.undo_count(), 1);
    assert_eq!(scene.tile(&"ground".into(), TileCoord::new(0, 0)).unwrap(), 0);
    assert_eq!(history.redo(&mut scene), Ok(false));
}
