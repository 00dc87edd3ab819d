use crate::ataxx::GameResult;
use std::collections::HashMap;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct EngineScore {
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
}

impl EngineScore {
    pub fn played(&self) -> u64 {
        self.wins + self.losses + self.draws
    }

    pub fn points(&self) -> f64 {
        self.wins as f64 + self.draws as f64 / 2.0
    }
}

/// Head-to-head tally for an engine pair, seen from the lower-indexed
/// engine's side.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct PairScore {
    pub wins_black: u64,
    pub wins_white: u64,
    pub losses_black: u64,
    pub losses_white: u64,
    pub draws: u64,
}

impl PairScore {
    pub fn wins(&self) -> u64 {
        self.wins_black + self.wins_white
    }

    pub fn losses(&self) -> u64 {
        self.losses_black + self.losses_white
    }
}

/// Order-insensitive fold of completed games into per-engine and
/// per-pair tallies. Callers share it behind a mutex.
#[derive(Clone, PartialEq, Debug)]
pub struct Results {
    engines: Vec<EngineScore>,
    pairs: HashMap<(usize, usize), PairScore>,
    completed: u64,
}

impl Results {
    pub fn new(num_engines: usize) -> Results {
        Results {
            engines: vec![EngineScore::default(); num_engines],
            pairs: HashMap::new(),
            completed: 0,
        }
    }

    /// Folds in one finished game; `black` and `white` are engine
    /// indices.
    pub fn add(&mut self, black: usize, white: usize, result: GameResult) {
        debug_assert!(black != white);
        self.completed += 1;

        let pair = self
            .pairs
            .entry((black.min(white), black.max(white)))
            .or_default();
        match result {
            GameResult::BlackWin => {
                self.engines[black].wins += 1;
                self.engines[white].losses += 1;
                if black < white {
                    pair.wins_black += 1;
                } else {
                    pair.losses_white += 1;
                }
            }
            GameResult::WhiteWin => {
                self.engines[white].wins += 1;
                self.engines[black].losses += 1;
                if white < black {
                    pair.wins_white += 1;
                } else {
                    pair.losses_black += 1;
                }
            }
            GameResult::Draw => {
                self.engines[black].draws += 1;
                self.engines[white].draws += 1;
                pair.draws += 1;
            }
            GameResult::None => {
                debug_assert!(false, "undecided game reached the aggregator");
            }
        }
    }

    pub fn engine(&self, index: usize) -> EngineScore {
        self.engines[index]
    }

    pub fn pair(&self, a: usize, b: usize) -> PairScore {
        self.pairs
            .get(&(a.min(b), a.max(b)))
            .copied()
            .unwrap_or_default()
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }
}
