use crate::ataxx::Side;
use crate::play::ResultReason;
use crate::tc::SearchSettings;
use crate::{cli, tournament};
use std::fs::File;
use std::io::{Error, Write};

#[derive(Debug)]
pub struct PgnWriter {
    file: File,
    engine_names: Vec<String>,
    options: cli::PgnOutOptions,
    meta: cli::MetaDataOptions,
    tc: SearchSettings,
}

impl PgnWriter {
    pub fn new(
        options: &cli::PgnOutOptions,
        meta: &cli::MetaDataOptions,
        tc: SearchSettings,
        engine_names: Vec<String>,
    ) -> Result<PgnWriter, Error> {
        Ok(PgnWriter {
            file: File::create_new(&options.file)?,
            engine_names,
            options: options.clone(),
            meta: meta.clone(),
            tc,
        })
    }

    fn write_header(file: &mut File, key: &str, value: &str) -> Result<(), Error> {
        writeln!(file, "[{} {:?}]", key, value)?;
        Ok(())
    }

    pub fn write(&mut self, match_result: &tournament::MatchResult) -> Result<(), Error> {
        let f = &mut self.file;
        let ticket = &match_result.ticket;
        let record = &match_result.record;
        let black_name = &self.engine_names[ticket.engines[0]];
        let white_name = &self.engine_names[ticket.engines[1]];
        let date_str = match_result.game_start.format("%Y-%m-%d").to_string();
        let result_str = match record.result.winner() {
            Some(Side::Black) => "1-0",
            Some(Side::White) => "0-1",
            None if record.result.is_draw() => "1/2-1/2",
            None => "*",
        };

        Self::write_header(f, "Event", &self.meta.event_name)?;
        Self::write_header(f, "Site", &self.meta.site_name)?;
        Self::write_header(f, "Date", &date_str)?;
        Self::write_header(f, "Round", &(ticket.id + 1).to_string())?;
        Self::write_header(f, "Black", black_name)?;
        Self::write_header(f, "White", white_name)?;
        Self::write_header(f, "FEN", &record.startpos.get_fen())?;
        Self::write_header(f, "Result", result_str)?;
        match record.result.winner() {
            Some(Side::Black) => {
                Self::write_header(f, "Winner", black_name)?;
                Self::write_header(f, "Loser", white_name)?;
            }
            Some(Side::White) => {
                Self::write_header(f, "Winner", white_name)?;
                Self::write_header(f, "Loser", black_name)?;
            }
            None => {}
        }
        match record.reason {
            ResultReason::Normal | ResultReason::None => {}
            ResultReason::IllegalMove => {
                let movestr = record.illegal_move.as_deref().unwrap_or("");
                Self::write_header(f, "Adjudicated", &format!("Illegal move {movestr}"))?;
            }
            reason => {
                Self::write_header(f, "Adjudicated", &reason.to_string())?;
            }
        }
        Self::write_header(f, "PlyCount", &record.history.len().to_string())?;
        Self::write_header(f, "Final FEN", &record.endpos.get_fen())?;
        let material = record.endpos.material();
        Self::write_header(
            f,
            "Material",
            &format!("{}{material}", if material >= 0 { "+" } else { "" }),
        )?;
        Self::write_header(f, "GameStartTime", &match_result.game_start.to_rfc3339())?;
        Self::write_header(f, "TimeControl", &self.tc.to_string())?;

        writeln!(f)?;

        for m in &record.history {
            let mstr = if m.mstr.is_empty() {
                "output-was-empty"
            } else {
                &m.mstr
            };
            if self.options.verbose {
                write!(f, "{mstr} {{movetime {}}}", m.elapsed_ms)?;
                if let Some(time_left) = m.time_left {
                    write!(f, " {{time left {time_left}ms}}")?;
                }
                writeln!(f)?;
            } else {
                writeln!(f, "{mstr}")?;
            }
        }

        writeln!(f, "{result_str}")?;
        writeln!(f)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ataxx::{GameResult, Move, Position};
    use crate::play::{GameRecord, MoveRecord};
    use crate::tournament::{MatchResult, MatchTicket};
    use chrono::Utc;
    use std::fs;

    fn sample_result(verbose_history: bool) -> MatchResult {
        let startpos = Position::startpos();
        let mut endpos = startpos;
        let mv = Move::parse("a6").unwrap();
        endpos.makemove(mv);

        let mut record = GameRecord::new(startpos);
        record.result = GameResult::BlackWin;
        record.reason = ResultReason::OutOfTime;
        record.endpos = endpos;
        record.history.push(MoveRecord {
            mv,
            mstr: String::from("a6"),
            elapsed_ms: 132,
            time_left: verbose_history.then_some(868),
        });

        MatchResult {
            ticket: MatchTicket {
                id: 0,
                opening: startpos,
                engines: [0, 1],
            },
            game_start: Utc::now(),
            record,
        }
    }

    fn write_to_string(options: &cli::PgnOutOptions, result: &MatchResult) -> String {
        let mut writer = PgnWriter::new(
            options,
            &cli::MetaDataOptions {
                event_name: String::from("test event"),
                site_name: String::from("here"),
            },
            SearchSettings::fischer(
                std::time::Duration::from_secs(1),
                std::time::Duration::ZERO,
            ),
            vec![String::from("alpha"), String::from("beta")],
        )
        .unwrap();
        writer.write(result).unwrap();
        fs::read_to_string(&options.file).unwrap()
    }

    #[test]
    fn headers_and_moves() {
        let dir = tempfile::tempdir().unwrap();
        let options = cli::PgnOutOptions {
            file: dir
                .path()
                .join("out.pgn")
                .to_string_lossy()
                .into_owned(),
            verbose: false,
        };

        let text = write_to_string(&options, &sample_result(false));

        assert!(text.contains("[Event \"test event\"]"));
        assert!(text.contains("[Black \"alpha\"]"));
        assert!(text.contains("[White \"beta\"]"));
        assert!(text.contains("[Result \"1-0\"]"));
        assert!(text.contains("[Winner \"alpha\"]"));
        assert!(text.contains("[Loser \"beta\"]"));
        assert!(text.contains("[Adjudicated \"Out of time\"]"));
        assert!(text.contains("[PlyCount \"1\"]"));
        assert!(text.contains("[Material \"+1\"]"));
        assert!(text.contains(&format!(
            "[FEN {:?}]",
            Position::startpos().get_fen()
        )));
        assert!(text.contains("\na6\n"));
        assert!(text.contains("\n1-0\n"));
        assert!(!text.contains("movetime"));
    }

    #[test]
    fn verbose_move_comments() {
        let dir = tempfile::tempdir().unwrap();
        let options = cli::PgnOutOptions {
            file: dir
                .path()
                .join("out.pgn")
                .to_string_lossy()
                .into_owned(),
            verbose: true,
        };

        let text = write_to_string(&options, &sample_result(true));

        assert!(text.contains("a6 {movetime 132} {time left 868ms}"));
    }

    #[test]
    fn draw_has_no_winner_header() {
        let dir = tempfile::tempdir().unwrap();
        let options = cli::PgnOutOptions {
            file: dir
                .path()
                .join("out.pgn")
                .to_string_lossy()
                .into_owned(),
            verbose: false,
        };

        let mut result = sample_result(false);
        result.record.result = GameResult::Draw;
        result.record.reason = ResultReason::Normal;
        let text = write_to_string(&options, &result);

        assert!(text.contains("[Result \"1/2-1/2\"]"));
        assert!(!text.contains("[Winner"));
        assert!(!text.contains("[Adjudicated"));
    }
}
