use crate::tournament::{MatchResult, MatchTicket, Tournament, TournamentState};
use crate::{cli, pgn, tc};
use log::error;

pub struct PgnOutWrapper {
    inner: Box<dyn Tournament>,
    pgn: pgn::PgnWriter,
}

impl PgnOutWrapper {
    pub fn new(
        inner: Box<dyn Tournament>,
        options: &cli::PgnOutOptions,
        meta: &cli::MetaDataOptions,
        tc: tc::SearchSettings,
        engine_names: Vec<String>,
    ) -> Result<PgnOutWrapper, std::io::Error> {
        Ok(PgnOutWrapper {
            inner,
            pgn: pgn::PgnWriter::new(options, meta, tc, engine_names)?,
        })
    }
}

impl Tournament for PgnOutWrapper {
    fn next(&mut self) -> Option<MatchTicket> {
        self.inner.as_mut().next()
    }
    fn match_started(&mut self, ticket: &MatchTicket) {
        self.inner.as_mut().match_started(ticket)
    }
    fn match_complete(&mut self, result: MatchResult) -> TournamentState {
        // A failed write loses one record, not the tournament.
        if let Err(err) = self.pgn.write(&result) {
            error!("failed to write pgn for game {}: {err}", result.ticket.id);
        }
        self.inner.as_mut().match_complete(result)
    }
    fn print_interval_report(&self) {
        self.inner.print_interval_report()
    }
    fn tournament_complete(&self) {
        self.inner.tournament_complete()
    }
    fn expected_maximum_match_count(&self) -> Option<u64> {
        self.inner.as_ref().expected_maximum_match_count()
    }
}
