use crate::adjudicate::{self, AdjudicationSettings};
use crate::ataxx::{GameResult, Move, Position, Side};
use crate::callbacks::Callbacks;
use crate::engine::Engine;
use crate::tc::{Expiry, GameClock, SearchSettings};
use log::{info, warn};
use std::fmt;
use std::io;
use std::time::Instant;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum ResultReason {
    Normal,
    OutOfTime,
    MaterialImbalance,
    EasyFill,
    Gamelength,
    IllegalMove,
    EngineCrash,
    #[default]
    None,
}

impl fmt::Display for ResultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultReason::Normal => write!(f, "Normal"),
            ResultReason::OutOfTime => write!(f, "Out of time"),
            ResultReason::MaterialImbalance => write!(f, "Material imbalance"),
            ResultReason::EasyFill => write!(f, "Easy fill"),
            ResultReason::Gamelength => write!(f, "Max game length reached"),
            ResultReason::IllegalMove => write!(f, "Illegal move"),
            ResultReason::EngineCrash => write!(f, "Engine crash"),
            ResultReason::None => write!(f, "None"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MoveRecord {
    pub mv: Move,
    pub mstr: String,
    pub elapsed_ms: u64,
    pub time_left: Option<i64>,
}

/// The complete record of one played game.
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub result: GameResult,
    pub reason: ResultReason,
    pub startpos: Position,
    pub endpos: Position,
    pub history: Vec<MoveRecord>,
    pub illegal_move: Option<String>,
}

impl GameRecord {
    pub fn new(startpos: Position) -> GameRecord {
        GameRecord {
            result: GameResult::None,
            reason: ResultReason::None,
            startpos,
            endpos: startpos,
            history: vec![],
            illegal_move: None,
        }
    }

    /// The record of a game that never got under way because an engine
    /// could not be started. The side to move takes the loss.
    pub fn stillborn(startpos: Position) -> GameRecord {
        let mut record = GameRecord::new(startpos);
        record.result = GameResult::win_for(!startpos.get_turn());
        record.reason = ResultReason::EngineCrash;
        record
    }
}

/// Plays one game between two spawned engines. Engine faults never
/// escape: any I/O failure becomes an `EngineCrash` loss for the side to
/// move, and the returned record always carries a decided result.
pub fn play(
    adjudication: &AdjudicationSettings,
    tc: &SearchSettings,
    opening: &Position,
    engine1: &mut dyn Engine,
    engine2: &mut dyn Engine,
    callbacks: &dyn Callbacks,
) -> GameRecord {
    let mut record = GameRecord::new(*opening);
    let mut pos = *opening;
    let mut clock = GameClock::new(tc);

    if let Err(err) = play_inner(
        adjudication,
        &mut clock,
        &mut pos,
        engine1,
        engine2,
        callbacks,
        &mut record,
    ) {
        warn!("engine i/o failure: {err}");
        record.result = GameResult::win_for(!pos.get_turn());
        record.reason = ResultReason::EngineCrash;
    }

    // The rule engine decides games that ran to the end.
    if record.result == GameResult::None {
        record.result = pos.get_result();
        record.reason = ResultReason::Normal;
    }
    record.endpos = pos;
    record
}

fn play_inner(
    adjudication: &AdjudicationSettings,
    clock: &mut GameClock,
    pos: &mut Position,
    engine1: &mut dyn Engine,
    engine2: &mut dyn Engine,
    callbacks: &dyn Callbacks,
    record: &mut GameRecord,
) -> io::Result<()> {
    engine1.newgame()?;
    engine2.newgame()?;

    engine1.isready()?;
    engine2.isready()?;

    while !pos.is_gameover() {
        if let Some(material) = &adjudication.material
            && adjudicate::can_adjudicate_material(pos, material)
        {
            record.result = GameResult::win_for(pos.get_turn());
            record.reason = ResultReason::MaterialImbalance;
            return Ok(());
        }

        if adjudication.easyfill && adjudicate::can_adjudicate_easyfill(pos) {
            record.result = GameResult::win_for(!pos.get_turn());
            record.reason = ResultReason::EasyFill;
            return Ok(());
        }

        if let Some(max_plies) = adjudication.max_plies
            && adjudicate::can_adjudicate_gamelength(pos, max_plies)
        {
            record.result = GameResult::Draw;
            record.reason = ResultReason::Gamelength;
            return Ok(());
        }

        let stm = pos.get_turn();
        let engine: &mut dyn Engine = if stm == Side::Black {
            &mut *engine1
        } else {
            &mut *engine2
        };

        engine.position(pos)?;
        engine.isready()?;

        let t0 = Instant::now();
        let mstr = engine.go(clock)?;
        let elapsed = t0.elapsed();

        let mv = match Move::parse(&mstr) {
            Some(mv) if pos.is_legal_move(mv) => mv,
            _ => {
                info!("Illegal move {:?} played by {}", mstr, engine.name());
                record.result = GameResult::win_for(!stm);
                record.reason = ResultReason::IllegalMove;
                record.illegal_move = Some(mstr);
                return Ok(());
            }
        };

        let elapsed_ms = elapsed.as_millis() as u64;
        record.history.push(MoveRecord {
            mv,
            mstr,
            elapsed_ms,
            time_left: None,
        });
        callbacks.on_move(mv, elapsed_ms);

        clock.subtract(stm, elapsed);

        match clock.expired(stm, elapsed, adjudication.timeout_buffer) {
            Expiry::None => {}
            Expiry::Black => {
                record.result = GameResult::WhiteWin;
                record.reason = ResultReason::OutOfTime;
                return Ok(());
            }
            Expiry::White => {
                record.result = GameResult::BlackWin;
                record.reason = ResultReason::OutOfTime;
                return Ok(());
            }
        }

        clock.increment(stm);
        if let Some(last) = record.history.last_mut() {
            last.time_left = clock.time_left(stm);
        }

        pos.makemove(mv);
    }

    Ok(())
}
