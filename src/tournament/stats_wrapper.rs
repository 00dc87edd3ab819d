use crate::callbacks::Callbacks;
use crate::results::Results;
use crate::tournament::{MatchResult, MatchTicket, Tournament, TournamentState};
use std::sync::{Arc, Mutex};

/// Folds finished games into the running score and prints a standings
/// table every `report_interval` games and at the end.
pub struct StatsWrapper {
    inner: Box<dyn Tournament>,
    results: Arc<Mutex<Results>>,
    engine_names: Vec<String>,
    report_interval: Option<u64>,
    callbacks: Arc<dyn Callbacks>,
}

impl StatsWrapper {
    pub fn new(
        inner: Box<dyn Tournament>,
        engine_names: Vec<String>,
        report_interval: Option<u64>,
        callbacks: Arc<dyn Callbacks>,
    ) -> StatsWrapper {
        let results = Arc::new(Mutex::new(Results::new(engine_names.len())));
        StatsWrapper {
            inner,
            results,
            engine_names,
            report_interval,
            callbacks,
        }
    }
}

impl Tournament for StatsWrapper {
    fn next(&mut self) -> Option<MatchTicket> {
        self.inner.as_mut().next()
    }
    fn match_started(&mut self, ticket: &MatchTicket) {
        self.inner.as_mut().match_started(ticket)
    }
    fn match_complete(&mut self, result: MatchResult) -> TournamentState {
        let completed = {
            let mut results = self.results.lock().unwrap();
            results.add(
                result.ticket.engines[0],
                result.ticket.engines[1],
                result.record.result,
            );
            self.callbacks.on_results_update(&results);
            results.completed()
        };

        if let Some(interval) = self.report_interval
            && completed % interval == 0
        {
            self.print_interval_report();
        }

        self.inner.as_mut().match_complete(result)
    }
    fn print_interval_report(&self) {
        let results = self.results.lock().unwrap();
        println!("Score after {} games:", results.completed());
        for (i, name) in self.engine_names.iter().enumerate() {
            let score = results.engine(i);
            println!(
                "  {name}: {}W {}L {}D ({:.1} points / {} games)",
                score.wins,
                score.losses,
                score.draws,
                score.points(),
                score.played(),
            );
        }
        self.inner.print_interval_report()
    }
    fn tournament_complete(&self) {
        self.print_interval_report();
        let results = self.results.lock().unwrap();
        for a in 0..self.engine_names.len() {
            for b in a + 1..self.engine_names.len() {
                let pair = results.pair(a, b);
                if pair.wins() + pair.losses() + pair.draws == 0 {
                    continue;
                }
                println!(
                    "  {} vs {}: +{} -{} ={}",
                    self.engine_names[a],
                    self.engine_names[b],
                    pair.wins(),
                    pair.losses(),
                    pair.draws,
                );
            }
        }
        self.inner.tournament_complete()
    }
    fn expected_maximum_match_count(&self) -> Option<u64> {
        self.inner.as_ref().expected_maximum_match_count()
    }
}
