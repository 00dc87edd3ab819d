use log::info;
use rand::SeedableRng;
use std::collections::HashSet;
use std::process::ExitCode;
use std::sync::Arc;

mod adjudicate;
mod ataxx;
mod book;
mod callbacks;
mod cli;
mod engine;
mod pgn;
mod play;
mod results;
mod runner;
mod tc;
mod tournament;

use callbacks::{Callbacks, LogCallbacks};

fn main() -> ExitCode {
    flexi_logger::Logger::try_with_env().unwrap().start().ok();

    let Some(cli_options) = cli::parse() else {
        return ExitCode::FAILURE;
    };
    info!("{:#?}", &cli_options);

    if cli_options.engines.len() < 2 {
        eprintln!("We require at least two engines to be supplied.");
        return ExitCode::FAILURE;
    }

    let Some(book_options) = &cli_options.book else {
        eprintln!("Openings file required.");
        return ExitCode::FAILURE;
    };

    let opening_book = {
        let mut rng = match cli_options.rand_seed {
            Some(seed) => rand_chacha::ChaCha8Rng::seed_from_u64(seed),
            None => rand_chacha::ChaCha8Rng::from_os_rng(),
        };
        match book::OpeningBook::new(book_options, &mut rng) {
            Ok(book) => book,
            Err(err) => {
                eprintln!("{err:#}");
                return ExitCode::FAILURE;
            }
        }
    };

    let callbacks: Arc<dyn Callbacks> = Arc::new(LogCallbacks);

    let engine_names = match cli_options.engine_names(&callbacks) {
        Ok(names) => names,
        Err(err) => {
            eprintln!("Failed to start an engine: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut seen = HashSet::new();
    for name in &engine_names {
        if !seen.insert(name) {
            eprintln!("Duplicate engine name {name:?}; give one a name= option.");
            return ExitCode::FAILURE;
        }
    }

    let mut tournament: Box<dyn tournament::Tournament> = Box::new(tournament::RoundRobin::new(
        &cli_options,
        opening_book,
    ));

    if let Some(pgn) = &cli_options.pgn {
        tournament = match tournament::PgnOutWrapper::new(
            tournament,
            pgn,
            &cli_options.meta,
            cli_options.tc,
            engine_names.clone(),
        ) {
            Ok(wrapper) => Box::new(wrapper),
            Err(err) => {
                eprintln!("Failed to open pgn output {}: {err}", pgn.file);
                return ExitCode::FAILURE;
            }
        };
    }

    tournament = Box::new(tournament::StatsWrapper::new(
        tournament,
        engine_names.clone(),
        cli_options.report_interval,
        callbacks.clone(),
    ));

    tournament = Box::new(tournament::ReporterWrapper::new(
        tournament,
        engine_names.clone(),
    ));

    let r = runner::Runner::new(&cli_options, callbacks);
    r.run(tournament);

    ExitCode::SUCCESS
}
