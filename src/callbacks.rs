use crate::ataxx::{GameResult, Move};
use crate::results::Results;
use log::{debug, trace};

/// Observer hooks for everything the tournament makes externally visible.
/// All methods default to no-ops; implementations may be shared across
/// worker threads.
#[allow(unused_variables)]
pub trait Callbacks: Send + Sync {
    fn on_engine_start(&self, name: &str) {}
    fn on_game_started(&self, id: u64, fen: &str, black: &str, white: &str) {}
    fn on_game_finished(&self, id: u64, result: GameResult, black: &str, white: &str) {}
    fn on_results_update(&self, results: &Results) {}
    fn on_info_send(&self, line: &str) {}
    fn on_info_recv(&self, line: &str) {}
    fn on_move(&self, mv: Move, elapsed_ms: u64) {}
}

/// The stock sink: forwards everything to the logger.
pub struct LogCallbacks;

impl Callbacks for LogCallbacks {
    fn on_engine_start(&self, name: &str) {
        debug!("engine started: {name}");
    }

    fn on_game_started(&self, id: u64, fen: &str, black: &str, white: &str) {
        debug!("game {id} started from {fen}: {black} vs {white}");
    }

    fn on_game_finished(&self, id: u64, result: GameResult, black: &str, white: &str) {
        debug!("game {id} finished ({black} vs {white}): {result:?}");
    }

    fn on_move(&self, mv: Move, elapsed_ms: u64) {
        trace!("move {mv} in {elapsed_ms}ms");
    }
}
