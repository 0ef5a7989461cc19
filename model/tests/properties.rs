use model::{Game, Side, MAX_PIECE};
use ndarray::Array2;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn grids() -> impl Strategy<Value = Array2<u32>> {
    (2usize..=5).prop_flat_map(|size| {
        prop::collection::vec(
            prop_oneof![3 => Just(0u32), 7 => (1u32..=10).prop_map(|e| 1 << e)],
            size * size,
        )
        .prop_map(move |cells| Array2::from_shape_vec((size, size), cells).unwrap())
    })
}

fn any_side() -> impl Strategy<Value = Side> {
    prop::sample::select(Side::ALL.to_vec())
}

/// Physical (col, row) cells of every line of the field, each listed from the
/// edge tiles move towards.
fn lanes(size: usize, side: Side) -> Vec<Vec<(usize, usize)>> {
    (0..size)
        .map(|k| -> Vec<(usize, usize)> {
            match side {
                Side::North => (0..size).rev().map(|r| (k, r)).collect(),
                Side::South => (0..size).map(|r| (k, r)).collect(),
                Side::East => (0..size).rev().map(|c| (c, k)).collect(),
                Side::West => (0..size).map(|c| (c, k)).collect(),
            }
        })
        .collect()
}

/// Classic single-line 2048 slide, leading cell first.
fn slide_line(line: &[u32]) -> (Vec<u32>, u32) {
    let tiles: Vec<u32> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut out = Vec::with_capacity(line.len());
    let mut gained = 0;
    let mut i = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] {
            out.push(tiles[i] * 2);
            gained += tiles[i] * 2;
            i += 2;
        } else {
            out.push(tiles[i]);
            i += 1;
        }
    }
    out.resize(line.len(), 0);
    (out, gained)
}

/// Expected field (indexed `[[row, col]]`) and points after tilting `values`.
fn reference_tilt(values: &Array2<u32>, side: Side) -> (Array2<u32>, u32) {
    let size = values.shape()[0];
    let mut result = Array2::zeros((size, size));
    let mut points = 0;
    for lane in lanes(size, side) {
        let line: Vec<u32> = lane.iter().map(|&(c, r)| values[[r, c]]).collect();
        let (slid, gained) = slide_line(&line);
        for (&(c, r), v) in lane.iter().zip(slid) {
            result[[r, c]] = v;
        }
        points += gained;
    }
    (result, points)
}

fn expected_game_over(values: &Array2<u32>) -> bool {
    let size = values.shape()[0];
    if values.iter().any(|&v| v == MAX_PIECE) {
        return true;
    }
    if values.iter().any(|&v| v == 0) {
        return false;
    }
    for r in 0..size {
        for c in 0..size {
            if c + 1 < size && values[[r, c]] == values[[r, c + 1]] {
                return false;
            }
            if r + 1 < size && values[[r, c]] == values[[r + 1, c]] {
                return false;
            }
        }
    }
    true
}

proptest! {
    #[test]
    fn tilt_matches_line_by_line_slide(values in grids(), side in any_side()) {
        let mut game = Game::from_values(&values, 0, 0, false).unwrap();
        let (expected, points) = reference_tilt(&values, side);
        let changed = game.tilt(side);
        prop_assert_eq!(game.field().into_array(), expected.clone());
        prop_assert_eq!(game.score(), points);
        prop_assert_eq!(changed, expected != values);
    }

    #[test]
    fn tilt_conserves_value_and_merges_once(values in grids(), side in any_side()) {
        let mut game = Game::from_values(&values, 0, 0, false).unwrap();
        let before_max = values.iter().copied().max().unwrap_or(0);
        game.tilt(side);
        let after = game.field().into_array();
        prop_assert_eq!(after.sum(), values.sum());
        prop_assert!(after.iter().all(|&v| v <= before_max * 2));
        let merges = values.iter().filter(|&&v| v != 0).count()
            - after.iter().filter(|&&v| v != 0).count();
        prop_assert!(game.score() as usize >= merges * 4);
    }

    #[test]
    fn unchanged_tilt_is_a_fixed_point(values in grids(), side in any_side()) {
        let mut game = Game::from_values(&values, 0, 0, false).unwrap();
        if !game.tilt(side) {
            let before = game.clone();
            prop_assert!(!game.tilt(side));
            prop_assert_eq!(game, before);
        }
    }

    #[test]
    fn game_over_matches_neighbor_scan(values in grids(), side in any_side()) {
        let mut game = Game::from_values(&values, 0, 0, false).unwrap();
        game.tilt(side);
        prop_assert_eq!(game.game_over(), expected_game_over(&game.field().into_array()));
    }

    #[test]
    fn score_and_max_score_over_a_game(
        values in grids(),
        sides in prop::collection::vec(any_side(), 1..40),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::from_values(&values, 0, 0, false).unwrap();
        let mut expected_score = 0;
        for side in sides {
            let was_over = game.game_over();
            let prev_max = game.max_score();
            let (_, points) = reference_tilt(&game.field().into_array(), side);
            expected_score += points;
            if game.tilt(side) {
                game.spawn_tile(&mut rng);
            }
            prop_assert_eq!(game.score(), expected_score);
            prop_assert!(game.max_score() >= prev_max);
            if game.game_over() && !was_over {
                prop_assert_eq!(game.max_score(), prev_max.max(game.score()));
            } else {
                prop_assert_eq!(game.max_score(), prev_max);
            }
        }
    }
}
