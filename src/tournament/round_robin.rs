use crate::book::OpeningBook;
use crate::cli;
use crate::tournament::{MatchResult, MatchTicket, Tournament, TournamentState};

fn pairings_count(players: usize) -> u64 {
    (players * (players - 1) / 2) as u64
}

/// One scheduled game: an opening slot and the two player indices,
/// player1 taking black.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct GameInfo {
    pub id: u64,
    pub opening_index: usize,
    pub player1_index: usize,
    pub player2_index: usize,
}

/// Deterministic producer of the whole tournament's games. The stream
/// restarts its cycle after the last pair, with ids still increasing, so
/// callers decide when to stop via `expected`.
#[derive(Debug)]
pub struct RoundRobinGenerator {
    num_players: usize,
    num_games: usize,
    num_openings: usize,
    repeat: bool,
    id: u64,
    pair: [usize; 2],
    game_in_pair: usize,
}

impl RoundRobinGenerator {
    pub fn new(
        num_players: usize,
        num_games: usize,
        num_openings: usize,
        repeat: bool,
    ) -> RoundRobinGenerator {
        assert!(num_players >= 2);
        assert!(num_games >= 1);
        assert!(num_openings >= 1);
        RoundRobinGenerator {
            num_players,
            num_games,
            num_openings,
            repeat,
            id: 0,
            pair: [0, 1],
            game_in_pair: 0,
        }
    }

    /// Games in one full cycle. With `repeat` each pair plays `num_games`
    /// games, two per opening with colours swapped; without it each pair
    /// plays every opening once from fixed colours.
    pub fn expected(&self) -> u64 {
        let per_pair = if self.repeat {
            self.num_games
        } else {
            self.num_openings
        };
        pairings_count(self.num_players) * per_pair as u64
    }

    pub fn next(&mut self) -> GameInfo {
        let k = self.game_in_pair;
        let (opening_index, player1_index, player2_index) = if self.repeat {
            let opening = (k / 2) % self.num_openings;
            if k % 2 == 1 {
                (opening, self.pair[1], self.pair[0])
            } else {
                (opening, self.pair[0], self.pair[1])
            }
        } else {
            (k % self.num_openings, self.pair[0], self.pair[1])
        };

        let info = GameInfo {
            id: self.id,
            opening_index,
            player1_index,
            player2_index,
        };

        self.id += 1;
        self.game_in_pair += 1;
        let block = if self.repeat {
            self.num_games
        } else {
            self.num_openings
        };
        if self.game_in_pair >= block {
            self.game_in_pair = 0;
            self.pair[1] += 1;
            if self.pair[1] >= self.num_players {
                self.pair[0] += 1;
                self.pair[1] = self.pair[0] + 1;
                if self.pair[1] >= self.num_players {
                    self.pair = [0, 1];
                }
            }
        }

        info
    }
}

/// The round-robin tournament proper: resolves generator output against
/// the opening book and stops once every scheduled game is in.
#[derive(Debug)]
pub struct RoundRobin {
    generator: RoundRobinGenerator,
    book: OpeningBook,
    issued: u64,
    completed: u64,
    total: u64,
}

impl RoundRobin {
    pub fn new(options: &cli::CliOptions, book: OpeningBook) -> RoundRobin {
        debug_assert!(!book.is_empty());
        let generator = RoundRobinGenerator::new(
            options.engines.len(),
            options.games as usize,
            book.len(),
            options.repeat,
        );
        let total = generator.expected();
        RoundRobin {
            generator,
            book,
            issued: 0,
            completed: 0,
            total,
        }
    }
}

impl Tournament for RoundRobin {
    fn next(&mut self) -> Option<MatchTicket> {
        if self.issued >= self.total {
            return None;
        }
        self.issued += 1;
        let info = self.generator.next();
        Some(MatchTicket {
            id: info.id,
            opening: self.book.get(info.opening_index),
            engines: [info.player1_index, info.player2_index],
        })
    }

    fn match_started(&mut self, _ticket: &MatchTicket) {}

    fn match_complete(&mut self, _result: MatchResult) -> TournamentState {
        self.completed += 1;
        if self.completed >= self.total {
            TournamentState::Stop
        } else {
            TournamentState::Continue
        }
    }

    fn print_interval_report(&self) {}

    fn tournament_complete(&self) {}

    fn expected_maximum_match_count(&self) -> Option<u64> {
        Some(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: u64, opening: usize, player1: usize, player2: usize) -> GameInfo {
        GameInfo {
            id,
            opening_index: opening,
            player1_index: player1,
            player2_index: player2,
        }
    }

    #[test]
    fn two_players_two_games() {
        let mut generator = RoundRobinGenerator::new(2, 2, 2, true);

        assert_eq!(generator.expected(), 2);

        assert_eq!(generator.next(), info(0, 0, 0, 1));
        assert_eq!(generator.next(), info(1, 0, 1, 0));

        // Overflow
        assert_eq!(generator.next(), info(2, 0, 0, 1));
        assert_eq!(generator.next(), info(3, 0, 1, 0));

        // Extra overflow
        assert_eq!(generator.next(), info(4, 0, 0, 1));
        assert_eq!(generator.next(), info(5, 0, 1, 0));
        assert_eq!(generator.next(), info(6, 0, 0, 1));
        assert_eq!(generator.next(), info(7, 0, 1, 0));
        assert_eq!(generator.next(), info(8, 0, 0, 1));
        assert_eq!(generator.next(), info(9, 0, 1, 0));
    }

    #[test]
    fn two_players_four_games() {
        let mut generator = RoundRobinGenerator::new(2, 4, 2, true);

        assert_eq!(generator.expected(), 4);

        assert_eq!(generator.next(), info(0, 0, 0, 1));
        assert_eq!(generator.next(), info(1, 0, 1, 0));
        assert_eq!(generator.next(), info(2, 1, 0, 1));
        assert_eq!(generator.next(), info(3, 1, 1, 0));

        // Overflow
        assert_eq!(generator.next(), info(4, 0, 0, 1));
        assert_eq!(generator.next(), info(5, 0, 1, 0));
        assert_eq!(generator.next(), info(6, 1, 0, 1));
        assert_eq!(generator.next(), info(7, 1, 1, 0));
    }

    #[test]
    fn four_players() {
        let mut generator = RoundRobinGenerator::new(4, 2, 2, true);

        assert_eq!(generator.expected(), 12);

        assert_eq!(generator.next(), info(0, 0, 0, 1));
        assert_eq!(generator.next(), info(1, 0, 1, 0));
        assert_eq!(generator.next(), info(2, 0, 0, 2));
        assert_eq!(generator.next(), info(3, 0, 2, 0));
        assert_eq!(generator.next(), info(4, 0, 0, 3));
        assert_eq!(generator.next(), info(5, 0, 3, 0));

        assert_eq!(generator.next(), info(6, 0, 1, 2));
        assert_eq!(generator.next(), info(7, 0, 2, 1));
        assert_eq!(generator.next(), info(8, 0, 1, 3));
        assert_eq!(generator.next(), info(9, 0, 3, 1));

        assert_eq!(generator.next(), info(10, 0, 2, 3));
        assert_eq!(generator.next(), info(11, 0, 3, 2));

        // Overflow
        assert_eq!(generator.next(), info(12, 0, 0, 1));
        assert_eq!(generator.next(), info(13, 0, 1, 0));
    }

    #[test]
    fn no_repeat_keeps_colours_fixed() {
        let mut generator = RoundRobinGenerator::new(2, 2, 2, false);

        assert_eq!(generator.expected(), 2);

        assert_eq!(generator.next(), info(0, 0, 0, 1));
        assert_eq!(generator.next(), info(1, 1, 0, 1));

        // Overflow
        assert_eq!(generator.next(), info(2, 0, 0, 1));
        assert_eq!(generator.next(), info(3, 1, 0, 1));

        // Extra overflow
        assert_eq!(generator.next(), info(4, 0, 0, 1));
        assert_eq!(generator.next(), info(5, 1, 0, 1));
        assert_eq!(generator.next(), info(6, 0, 0, 1));
        assert_eq!(generator.next(), info(7, 1, 0, 1));
        assert_eq!(generator.next(), info(8, 0, 0, 1));
        assert_eq!(generator.next(), info(9, 1, 0, 1));
    }

    #[test]
    fn single_game_per_pair_keeps_one_colour() {
        let mut generator = RoundRobinGenerator::new(3, 1, 1, true);

        assert_eq!(generator.expected(), 3);
        assert_eq!(generator.next(), info(0, 0, 0, 1));
        assert_eq!(generator.next(), info(1, 0, 0, 2));
        assert_eq!(generator.next(), info(2, 0, 1, 2));
    }

    #[test]
    fn ids_are_unique_and_dense() {
        let mut generator = RoundRobinGenerator::new(5, 6, 3, true);
        let expected = generator.expected();
        let mut seen = std::collections::HashSet::new();
        for i in 0..expected {
            let info = generator.next();
            assert_eq!(info.id, i);
            assert!(info.player1_index != info.player2_index);
            assert!(seen.insert((
                info.player1_index.min(info.player2_index),
                info.player1_index.max(info.player2_index),
                info.opening_index,
                info.player1_index,
            )));
        }
    }

    #[test]
    fn repeat_plays_each_opening_from_both_sides() {
        let mut generator = RoundRobinGenerator::new(2, 6, 3, true);
        let mut by_opening = std::collections::HashMap::new();
        for _ in 0..generator.expected() {
            let info = generator.next();
            *by_opening
                .entry((info.opening_index, info.player1_index))
                .or_insert(0u32) += 1;
        }
        for opening in 0..3 {
            assert_eq!(by_opening.get(&(opening, 0)), Some(&1));
            assert_eq!(by_opening.get(&(opening, 1)), Some(&1));
        }
    }

    #[test]
    fn deterministic_across_runs() {
        let mut a = RoundRobinGenerator::new(4, 4, 2, true);
        let mut b = RoundRobinGenerator::new(4, 4, 2, true);
        for _ in 0..50 {
            assert_eq!(a.next(), b.next());
        }
    }
}
