use crate::ataxx::Position;
use std::time::Duration;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MaterialSettings {
    pub score: u32,
    pub min_plies: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AdjudicationSettings {
    pub material: Option<MaterialSettings>,
    pub easyfill: bool,
    pub max_plies: Option<u32>,
    pub timeout_buffer: Duration,
}

impl Default for AdjudicationSettings {
    fn default() -> Self {
        AdjudicationSettings {
            material: None,
            easyfill: false,
            max_plies: None,
            timeout_buffer: Duration::from_millis(10),
        }
    }
}

/// The side to move leads on material by at least `score` after at least
/// `min_plies` plies. Winner is the side to move.
pub fn can_adjudicate_material(pos: &Position, settings: &MaterialSettings) -> bool {
    pos.ply() >= settings.min_plies
        && pos.us().count() as i32 - pos.them().count() as i32 >= settings.score as i32
}

/// The side to move is locked out for the rest of the game while the
/// opponent can grow into every remaining empty square and win on the
/// final count. Winner is the side not to move.
pub fn can_adjudicate_easyfill(pos: &Position) -> bool {
    if !pos.must_pass() {
        return false;
    }

    let us = pos.us();
    let them = pos.them();
    let empty = pos.empty();

    if them.count() + empty.count() <= us.count() {
        return false;
    }

    // Grow the opponent over the empties until it stops spreading.
    let mut region = them;
    loop {
        let next = region | (region.singles() | region.doubles()) & empty;
        if next == region {
            break;
        }
        region = next;
    }

    (empty & !region).is_empty()
}

/// The game has reached `max_plies`. Result is a draw.
pub fn can_adjudicate_gamelength(pos: &Position, max_plies: u32) -> bool {
    pos.ply() >= max_plies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_requires_min_plies() {
        // Black to move, up 4 pieces, but the game just started.
        let pos = Position::from_fen("xxxx3/7/7/7/7/7/6o x 0 1").unwrap();
        let settings = MaterialSettings {
            score: 3,
            min_plies: 10,
        };
        assert!(!can_adjudicate_material(&pos, &settings));

        let pos = Position::from_fen("xxxx3/7/7/7/7/7/6o x 0 6").unwrap();
        assert!(can_adjudicate_material(&pos, &settings));
    }

    #[test]
    fn material_measures_the_mover() {
        // White to move and trailing: no adjudication even though the
        // absolute imbalance is large.
        let pos = Position::from_fen("xxxx3/7/7/7/7/7/6o o 0 20").unwrap();
        let settings = MaterialSettings {
            score: 3,
            min_plies: 0,
        };
        assert!(!can_adjudicate_material(&pos, &settings));

        let pos = Position::from_fen("xxxx3/7/7/7/7/7/6o x 0 20").unwrap();
        assert!(can_adjudicate_material(&pos, &settings));
    }

    #[test]
    fn easyfill_needs_a_locked_mover() {
        assert!(!can_adjudicate_easyfill(&Position::startpos()));
    }

    #[test]
    fn easyfill_fires_when_opponent_owns_the_rest() {
        // Black is walled into the corner and white can flood the board.
        let pos = Position::from_fen("x--4/---4/---4/7/7/7/o6 x 0 1").unwrap();
        assert!(can_adjudicate_easyfill(&pos));
    }

    #[test]
    fn easyfill_respects_unreachable_squares() {
        // The empty corner on g7 is fenced off from white, so the fill
        // can never complete.
        let pos = Position::from_fen("x--1--1/---1---/---1---/7/7/7/o6 x 0 1").unwrap();
        assert!(pos.must_pass());
        assert!(!can_adjudicate_easyfill(&pos));
    }

    #[test]
    fn gamelength_is_a_ply_threshold() {
        let pos = Position::from_fen("x5o/7/7/7/7/7/o5x x 0 201").unwrap();
        assert!(can_adjudicate_gamelength(&pos, 400));
        assert!(!can_adjudicate_gamelength(&pos, 401));
    }
}
