use crate::adjudicate::AdjudicationSettings;
use crate::callbacks::Callbacks;
use crate::engine::Engine;
use crate::play::{self, GameRecord};
use crate::tc::SearchSettings;
use crate::tournament::{MatchResult, MatchTicket, Tournament, TournamentState};
use crate::cli;
use chrono::Utc;
use crossbeam_channel;
use log::{error, info};
use std::sync::Arc;
use std::thread;

/// Runs the tournament over a pool of worker threads. Each worker plays
/// one game at a time against freshly spawned engine processes.
pub struct Runner {
    engines: Vec<cli::EngineOptions>,
    tc: SearchSettings,
    adjudication: AdjudicationSettings,
    concurrency: u64,
    callbacks: Arc<dyn Callbacks>,
}

impl Runner {
    pub fn new(options: &cli::CliOptions, callbacks: Arc<dyn Callbacks>) -> Runner {
        Runner {
            engines: options.engines.clone(),
            tc: options.tc,
            adjudication: options.adjudication.clone(),
            concurrency: options.concurrency,
            callbacks,
        }
    }

    pub fn run(&self, mut tournament: Box<dyn Tournament>) {
        let tournament = tournament.as_mut();

        let (send_ticket, recv_ticket) = crossbeam_channel::bounded(0);
        let (send_result, recv_result) = crossbeam_channel::bounded(0);

        let mut thread_handles = vec![];

        for i in 0..self.concurrency {
            let recv_ticket = recv_ticket.clone();
            let send_result = send_result.clone();
            let engines = self.engines.clone();
            let tc = self.tc;
            let adjudication = self.adjudication.clone();
            let callbacks = self.callbacks.clone();
            thread_handles.push(thread::spawn(move || {
                runner_thread_main(
                    engines,
                    tc,
                    adjudication,
                    i,
                    recv_ticket,
                    send_result,
                    callbacks,
                );
            }));
        }

        let mut state = TournamentState::Continue;
        let mut ticket = None;
        while state != TournamentState::Stop {
            if ticket.is_none() {
                ticket = tournament.next();
            }
            match ticket.clone() {
                None => {
                    crossbeam_channel::select! {
                        recv(recv_result) -> result => state = tournament.match_complete(result.unwrap()),
                    }
                }
                Some(t) => {
                    crossbeam_channel::select! {
                        recv(recv_result) -> result => state = tournament.match_complete(result.unwrap()),
                        send(send_ticket, Some(t.clone())) -> result => {
                            assert!(result.is_ok());
                            tournament.match_started(&t);
                            ticket = None;
                        }
                    }
                }
            }
        }

        for _ in 0..self.concurrency {
            send_ticket.send(None).unwrap();
        }

        while let Some(h) = thread_handles.pop() {
            h.join().expect("could not join thread");
        }

        tournament.tournament_complete();
    }
}

fn runner_thread_main(
    engine_options: Vec<cli::EngineOptions>,
    tc: SearchSettings,
    adjudication: AdjudicationSettings,
    thread_index: u64,
    recv: crossbeam_channel::Receiver<Option<MatchTicket>>,
    send: crossbeam_channel::Sender<MatchResult>,
    callbacks: Arc<dyn Callbacks>,
) {
    while let Some(ticket) = recv.recv().unwrap() {
        assert!(ticket.engines[0] != ticket.engines[1]);
        info!("Thread {thread_index} received ticket: {:?}", &ticket);

        let result = run_match(&engine_options, tc, &adjudication, ticket, &callbacks);

        info!(
            "Thread {thread_index} sending result of game {}: {:?} ({})",
            result.ticket.id, result.record.result, result.record.reason
        );
        send.send(result).unwrap();
    }
}

fn run_match(
    engine_options: &[cli::EngineOptions],
    tc: SearchSettings,
    adjudication: &AdjudicationSettings,
    ticket: MatchTicket,
    callbacks: &Arc<dyn Callbacks>,
) -> MatchResult {
    let game_start = Utc::now();
    let black = &engine_options[ticket.engines[0]];
    let white = &engine_options[ticket.engines[1]];

    let record = match (
        black.builder.init(callbacks.clone()),
        white.builder.init(callbacks.clone()),
    ) {
        (Ok(mut engine1), Ok(mut engine2)) => {
            callbacks.on_game_started(
                ticket.id,
                &ticket.opening.get_fen(),
                engine1.name(),
                engine2.name(),
            );
            let record = play::play(
                adjudication,
                &tc,
                &ticket.opening,
                &mut engine1,
                &mut engine2,
                callbacks.as_ref(),
            );
            let _ = engine1.quit();
            let _ = engine2.quit();
            record
        }
        (first, second) => {
            for err in [first.err(), second.err()].into_iter().flatten() {
                error!("failed to start engine: {err}");
            }
            GameRecord::stillborn(ticket.opening)
        }
    };

    callbacks.on_game_finished(
        ticket.id,
        record.result,
        black.builder.name.as_deref().unwrap_or(&black.builder.cmd),
        white.builder.name.as_deref().unwrap_or(&white.builder.cmd),
    );

    MatchResult {
        ticket,
        game_start,
        record,
    }
}
