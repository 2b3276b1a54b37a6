use tilekit_core::{LayerId, Scene, TileCoord, TileScene};
use tilekit_history::{HistoryConfig, HistoryManager, Operation, OperationKind};

fn scene() -> Scene {
    Scene::with_layers("history", 8, 8, ["ground"]).unwrap()
}

fn ground() -> LayerId {
    LayerId::new("ground")
}

/// Writes the tile like a tool would and returns the matching operation.
fn paint(scene: &mut Scene, x: u32, value: u32) -> Operation {
    let at = TileCoord::new(x, 0);
    let old = scene.set_tile(&ground(), at, value).unwrap();
    Operation::tile_paint("ground", at, old, value)
}

#[test]
fn test_stack_balance() {
    let mut scene = scene();
    let mut manager = HistoryManager::new(HistoryConfig::default());

    for x in 0..5 {
        let op = paint(&mut scene, x, x + 1);
        manager.push(op);
    }
    assert_eq!(manager.undo_count(), 5);

    for _ in 0..5 {
        assert_eq!(manager.undo(&mut scene), Ok(true));
    }
    assert!(!manager.can_undo());
    assert!(manager.can_redo());
    assert_eq!(manager.redo_count(), 5);
    assert_eq!(scene.filled_count(&ground()), 0);

    for _ in 0..5 {
        assert_eq!(manager.redo(&mut scene), Ok(true));
    }
    assert_eq!(manager.undo_count(), 5);
    assert!(!manager.can_redo());
    assert_eq!(scene.filled_count(&ground()), 5);
}

#[test]
fn test_redo_invalidation() {
    let mut scene = scene();
    let mut manager = HistoryManager::default();

    let op = paint(&mut scene, 0, 1);
    manager.push(op);
    manager.undo(&mut scene).unwrap();
    assert!(manager.can_redo());

    let op = paint(&mut scene, 1, 1);
    manager.push(op);
    assert!(!manager.can_redo());
}

#[test]
fn test_grouping_atomicity() {
    let mut scene = scene();
    let mut manager = HistoryManager::default();
    let at = TileCoord::new(2, 2);

    manager.begin_group("stroke");
    let old = scene.set_tile(&ground(), at, 1).unwrap();
    manager.push(Operation::tile_paint("ground", at, old, 1));
    let old = scene.set_tile(&ground(), at, 2).unwrap();
    manager.push(Operation::tile_paint("ground", at, old, 2));
    assert!(manager.end_group());

    assert_eq!(manager.undo_count(), 1);
    assert_eq!(manager.undo_description(), Some("stroke"));
    assert_eq!(manager.peek_undo().map(Operation::kind), Some(OperationKind::Composite));

    // B (1 -> 2) must be reversed before A (0 -> 1) for the cell to end at 0.
    assert_eq!(manager.undo(&mut scene), Ok(true));
    assert_eq!(scene.tile(&ground(), at).unwrap(), 0);
    assert!(!manager.can_undo());
}

#[test]
fn test_empty_group_leaves_stacks_unchanged() {
    let mut scene = scene();
    let mut manager = HistoryManager::default();
    let op = paint(&mut scene, 0, 1);
    manager.push(op);
    manager.undo(&mut scene).unwrap();
    let op = paint(&mut scene, 1, 1);
    manager.push(op);
    manager.undo(&mut scene).unwrap();
    manager.redo(&mut scene).unwrap();
    let before = manager.status();

    manager.begin_group("tap");
    assert!(!manager.end_group());

    assert_eq!(manager.status(), before);
}

#[test]
fn test_eviction() {
    let mut scene = scene();
    let mut manager = HistoryManager::new(HistoryConfig::with_max_undo_depth(2));

    for x in 0..3 {
        let op = paint(&mut scene, x, 7);
        manager.push(op);
    }
    assert_eq!(manager.undo_count(), 2);

    assert_eq!(manager.undo(&mut scene), Ok(true));
    assert_eq!(manager.undo(&mut scene), Ok(true));
    assert_eq!(manager.undo(&mut scene), Ok(false));

    // The first paint was evicted, so its tile keeps the painted value.
    assert_eq!(scene.tile(&ground(), TileCoord::new(0, 0)).unwrap(), 7);
    assert_eq!(scene.tile(&ground(), TileCoord::new(1, 0)).unwrap(), 0);
    assert_eq!(scene.tile(&ground(), TileCoord::new(2, 0)).unwrap(), 0);
}

#[test]
fn test_early_redo_clear() {
    let mut scene = scene();
    let mut manager = HistoryManager::default();
    let op = paint(&mut scene, 0, 1);
    manager.push(op);
    let op = paint(&mut scene, 1, 1);
    manager.push(op);
    manager.undo(&mut scene).unwrap();

    manager.begin_group("stroke");
    assert_eq!(manager.redo_count(), 1);
    let op = paint(&mut scene, 2, 1);
    manager.push(op);
    assert_eq!(manager.redo_count(), 0);
    assert!(manager.is_grouping());

    manager.end_group();
    assert_eq!(manager.undo_count(), 2);
}

#[test]
fn test_redo_respects_depth() {
    let mut scene = scene();
    let mut manager = HistoryManager::new(HistoryConfig::with_max_undo_depth(3));
    for x in 0..3 {
        let op = paint(&mut scene, x, 1);
        manager.push(op);
    }
    manager.undo(&mut scene).unwrap();
    manager.set_max_depth(2);
    manager.redo(&mut scene).unwrap();

    assert_eq!(manager.undo_count(), 2);
    assert_eq!(manager.redo_count(), 0);
}

#[test]
fn test_descriptions_most_recent_first() {
    let mut manager = HistoryManager::default();
    manager.push(Operation::fill("Fill pond", Vec::new()));
    manager.push(Operation::paste("Paste house", Vec::new()));

    assert_eq!(
        manager.undo_descriptions().collect::<Vec<_>>(),
        vec!["Paste house", "Fill pond"]
    );
    assert_eq!(manager.redo_descriptions().count(), 0);
}

#[test]
fn test_inner_group_folding_into_empty_outer_clears_redo() {
    let mut scene = scene();
    let mut manager = HistoryManager::default();

    let op = paint(&mut scene, 0, 1);
    manager.push(op);

    manager.begin_group("outer");
    manager.begin_group("inner");
    let op = paint(&mut scene, 1, 2);
    manager.push(op);

    assert_eq!(manager.undo(&mut scene), Ok(true));
    assert_eq!(manager.redo_count(), 1);

    // First insert into "outer" is the folded inner composite.
    assert!(manager.end_group());
    assert_eq!(manager.redo_count(), 0);

    assert!(manager.end_group());
    assert_eq!(manager.undo_count(), 1);
    assert_eq!(manager.undo_description(), Some("outer"));
    assert!(!manager.can_redo());
}
