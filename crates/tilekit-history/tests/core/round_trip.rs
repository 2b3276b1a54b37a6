use proptest::prelude::*;
use tilekit_core::{LayerId, Scene, TileCoord, TileScene};
use tilekit_history::{Operation, TileDelta};

const SIZE: u32 = 6;

fn layer_name(index: usize) -> &'static str {
    ["ground", "props", "collision"][index]
}

proptest! {
    #[test]
    fn prop_execute_then_undo_restores_scene(
        seed in proptest::collection::vec((0usize..3, 0..SIZE, 0..SIZE, 0u32..20), 0..24),
        writes in proptest::collection::vec((0usize..3, 0..SIZE, 0..SIZE, 0u32..20), 1..24),
    ) {
        let mut scene = Scene::with_layers("prop", SIZE, SIZE, ["ground", "props", "collision"]).unwrap();
        for (layer, x, y, value) in seed {
            scene.set_tile(&LayerId::new(layer_name(layer)), TileCoord::new(x, y), value).unwrap();
        }
        let before = scene.clone();

        // Apply the writes like a tool would, capturing old values as we go.
        let mut deltas = Vec::new();
        for (layer, x, y, value) in writes {
            let layer = LayerId::new(layer_name(layer));
            let at = TileCoord::new(x, y);
            let old = scene.set_tile(&layer, at, value).unwrap();
            deltas.push(TileDelta::new(layer, at, old, value));
        }
        let after = scene.clone();
        let op = Operation::fill("random fill", deltas);

        op.undo(&mut scene).unwrap();
        prop_assert_eq!(&scene, &before);

        op.execute(&mut scene).unwrap();
        prop_assert_eq!(&scene, &after);
    }
}
