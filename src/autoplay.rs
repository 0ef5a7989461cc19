use std::fmt;

use log::{debug, info};
use model::{Game, Side};
use rand::Rng;

/// Sides tried in order each move; the first one that changes the field wins.
pub const PREFERENCE: [Side; 4] = [Side::North, Side::West, Side::East, Side::South];

#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub moves: usize,
    pub score: u32,
    pub max_score: u32,
    pub highest_tile: u32,
    pub game_over: bool,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.game_over { "game over" } else { "stopped" };
        write!(
            f,
            "{outcome} after {} moves: score {}, max score {}, highest tile {}",
            self.moves, self.score, self.max_score, self.highest_tile
        )
    }
}

/// Start a fresh game and tilt until it ends, nothing moves, or `max_moves`
/// tilts were made. One tile is spawned after every tilt that changed the
/// field.
pub fn play<R: Rng + ?Sized>(game: &mut Game, rng: &mut R, max_moves: usize) -> Summary {
    game.start(rng);
    let mut moves = 0;
    while !game.game_over() && moves < max_moves {
        let mut tilted = None;
        for side in PREFERENCE.iter().copied() {
            if game.tilt(side) {
                tilted = Some(side);
                break;
            }
        }
        let side = match tilted {
            Some(side) => side,
            None => {
                info!("no side changes the field");
                break;
            }
        };
        moves += 1;
        game.spawn_tile(rng);
        debug!("move {moves}: {side:?}, score {}", game.score());
    }
    Summary {
        moves,
        score: game.score(),
        max_score: game.max_score(),
        highest_tile: game.field().tiles().map(|t| t.value()).max().unwrap_or(0),
        game_over: game.game_over(),
    }
}
