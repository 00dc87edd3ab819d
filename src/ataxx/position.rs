use crate::ataxx::{Bitboard, GameResult, Move, Side, Square};
use anyhow::{Result, bail};
use std::fmt;

pub const STARTPOS_FEN: &str = "x5o/7/7/7/7/7/o5x x 0 1";

/// A 7x7 Ataxx position. FEN rows run from rank 7 down to rank 1, with
/// `x`/`o` pieces, `-` blocked squares and digit runs of empties.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Position {
    pieces: [Bitboard; 2],
    gaps: Bitboard,
    turn: Side,
    halfmoves: u32,
    fullmoves: u32,
}

impl Position {
    pub fn startpos() -> Position {
        Self::from_fen(STARTPOS_FEN).unwrap()
    }

    pub fn from_fen(fen: &str) -> Result<Position> {
        let mut it = fen.split_whitespace();
        let Some(board) = it.next() else {
            bail!("empty fen");
        };

        let mut pieces = [Bitboard::EMPTY; 2];
        let mut gaps = Bitboard::EMPTY;

        let rows: Vec<&str> = board.split('/').collect();
        if rows.len() != 7 {
            bail!("expected 7 board rows, got {}", rows.len());
        }
        for (i, row) in rows.iter().enumerate() {
            let rank = 6 - i as u8;
            let mut file = 0u8;
            for ch in row.chars() {
                if file >= 7 {
                    bail!("row {row:?} is too wide");
                }
                match ch {
                    'x' | 'X' => {
                        pieces[Side::Black.to_index()] |= Square::from_coords(file, rank).bitboard();
                        file += 1;
                    }
                    'o' | 'O' => {
                        pieces[Side::White.to_index()] |= Square::from_coords(file, rank).bitboard();
                        file += 1;
                    }
                    '-' => {
                        gaps |= Square::from_coords(file, rank).bitboard();
                        file += 1;
                    }
                    '1'..='7' => {
                        file += ch as u8 - b'0';
                    }
                    _ => bail!("unexpected character {ch:?} in fen"),
                }
            }
            if file != 7 {
                bail!("row {row:?} does not cover 7 files");
            }
        }

        let turn = match it.next() {
            Some("x") | Some("X") | None => Side::Black,
            Some("o") | Some("O") => Side::White,
            Some(other) => bail!("bad side to move {other:?}"),
        };

        let halfmoves = match it.next() {
            Some(s) => match s.parse() {
                Ok(n) => n,
                Err(_) => bail!("bad halfmove counter {s:?}"),
            },
            None => 0,
        };
        let fullmoves = match it.next() {
            Some(s) => match s.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => bail!("bad fullmove counter {s:?}"),
            },
            None => 1,
        };

        Ok(Position {
            pieces,
            gaps,
            turn,
            halfmoves,
            fullmoves,
        })
    }

    pub fn get_fen(&self) -> String {
        self.to_string()
    }

    pub fn get_turn(&self) -> Side {
        self.turn
    }

    pub fn get_black(&self) -> Bitboard {
        self.pieces[Side::Black.to_index()]
    }

    pub fn get_white(&self) -> Bitboard {
        self.pieces[Side::White.to_index()]
    }

    /// Pieces of the side to move.
    pub fn us(&self) -> Bitboard {
        self.pieces[self.turn.to_index()]
    }

    /// Pieces of the side not to move.
    pub fn them(&self) -> Bitboard {
        self.pieces[(!self.turn).to_index()]
    }

    pub fn empty(&self) -> Bitboard {
        !(self.get_black() | self.get_white() | self.gaps)
    }

    /// Plies played since the start of the game, derived from the move
    /// counters.
    pub fn ply(&self) -> u32 {
        2 * (self.fullmoves - 1) + (self.turn == Side::White) as u32
    }

    /// Signed material balance, black minus white.
    pub fn material(&self) -> i32 {
        self.get_black().count() as i32 - self.get_white().count() as i32
    }

    fn reach(side: Bitboard) -> Bitboard {
        side.singles().singles()
    }

    fn side_can_move(&self, side: Side) -> bool {
        (Self::reach(self.pieces[side.to_index()]) & self.empty()).any()
    }

    /// The side to move has pieces but no single or jump available.
    pub fn must_pass(&self) -> bool {
        self.us().any() && !self.side_can_move(self.turn)
    }

    pub fn moves(&self) -> Vec<Move> {
        let empty = self.empty();
        let us = self.us();

        let mut moves: Vec<Move> = (us.singles() & empty).map(Move::Single).collect();
        for from in us {
            for to in from.bitboard().doubles() & empty {
                moves.push(Move::Jump { from, to });
            }
        }

        if moves.is_empty() && us.any() && !self.is_gameover() {
            moves.push(Move::Pass);
        }
        moves
    }

    pub fn is_legal_move(&self, mv: Move) -> bool {
        if self.is_gameover() {
            return false;
        }
        let empty = self.empty();
        match mv {
            Move::Pass => self.must_pass(),
            Move::Single(to) => (self.us().singles() & empty).contains(to),
            Move::Jump { from, to } => {
                self.us().contains(from) && empty.contains(to) && from.chebyshev_distance(to) == 2
            }
        }
    }

    pub fn makemove(&mut self, mv: Move) {
        debug_assert!(self.is_legal_move(mv));
        let us = self.turn.to_index();
        let them = (!self.turn).to_index();
        match mv {
            Move::Pass => {
                self.halfmoves += 1;
            }
            Move::Single(to) => {
                let captured = to.bitboard().singles() & self.pieces[them];
                self.pieces[us] |= to.bitboard() | captured;
                self.pieces[them] ^= captured;
                self.halfmoves = 0;
            }
            Move::Jump { from, to } => {
                let captured = to.bitboard().singles() & self.pieces[them];
                self.pieces[us] = self.pieces[us] & !from.bitboard() | to.bitboard() | captured;
                self.pieces[them] ^= captured;
                self.halfmoves = if captured.any() { 0 } else { self.halfmoves + 1 };
            }
        }
        if self.turn == Side::White {
            self.fullmoves += 1;
        }
        self.turn = !self.turn;
    }

    pub fn is_gameover(&self) -> bool {
        if self.get_black().is_empty() || self.get_white().is_empty() {
            return true;
        }
        if self.halfmoves >= 100 {
            return true;
        }
        if self.empty().is_empty() {
            return true;
        }
        !self.side_can_move(Side::Black) && !self.side_can_move(Side::White)
    }

    /// Terminal evaluation. `GameResult::None` while the game is still on.
    pub fn get_result(&self) -> GameResult {
        if !self.is_gameover() {
            return GameResult::None;
        }
        if self.get_black().is_empty() {
            return GameResult::WhiteWin;
        }
        if self.get_white().is_empty() {
            return GameResult::BlackWin;
        }
        if self.halfmoves >= 100 {
            return GameResult::Draw;
        }
        match self.material() {
            d if d > 0 => GameResult::BlackWin,
            d if d < 0 => GameResult::WhiteWin,
            _ => GameResult::Draw,
        }
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..7).rev() {
            let mut empties = 0;
            for file in 0..7 {
                let sq = Square::from_coords(file, rank);
                let ch = if self.get_black().contains(sq) {
                    'x'
                } else if self.get_white().contains(sq) {
                    'o'
                } else if self.gaps.contains(sq) {
                    '-'
                } else {
                    empties += 1;
                    continue;
                };
                if empties > 0 {
                    write!(f, "{empties}")?;
                    empties = 0;
                }
                write!(f, "{ch}")?;
            }
            if empties > 0 {
                write!(f, "{empties}")?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }
        write!(f, " {} {} {}", self.turn, self.halfmoves, self.fullmoves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_roundtrip() {
        for fen in [
            STARTPOS_FEN,
            "x5o/7/2-1-2/7/2-1-2/7/o5x x 0 1",
            "x5o/7/2-1-2/7/2-1-2/7/o5x o 3 10",
            "7/7/7/7/7/7/7 x 0 1",
            "x5o/7/7/7/7/7/o5x o 0 1",
        ] {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(pos.get_fen(), fen, "{fen}");
        }
    }

    #[test]
    fn fen_defaults() {
        let pos = Position::from_fen("x5o/7/7/7/7/7/o5x x").unwrap();
        assert_eq!(pos.get_fen(), STARTPOS_FEN);
    }

    #[test]
    fn fen_rejects_garbage() {
        for fen in [
            "",
            "x5o/7/7/7/7/7",
            "x5o/7/7/7/7/7/o5x q 0 1",
            "x6o/7/7/7/7/7/o5x x 0 1",
            "x5o/7/7/7/7/7/o5x x 0 0",
            "z5o/7/7/7/7/7/o5x x 0 1",
        ] {
            assert!(Position::from_fen(fen).is_err(), "{fen}");
        }
    }

    #[test]
    fn startpos_movegen() {
        let pos = Position::startpos();
        let moves = pos.moves();
        assert_eq!(moves.len(), 16);
        assert_eq!(
            moves.iter().filter(|m| matches!(m, Move::Single(_))).count(),
            6
        );
        for m in moves {
            assert!(pos.is_legal_move(m));
        }
    }

    #[test]
    fn ply_counter() {
        let mut pos = Position::startpos();
        assert_eq!(pos.ply(), 0);
        pos.makemove(Move::parse("a6").unwrap());
        assert_eq!(pos.ply(), 1);
        pos.makemove(Move::parse("b1").unwrap());
        assert_eq!(pos.ply(), 2);
    }

    #[test]
    fn single_captures_neighbours() {
        // Black plays b5 next to the white stone on a5 and flips it.
        let mut pos = Position::from_fen("7/7/o6/1x5/7/7/7 x 0 1").unwrap();
        pos.makemove(Move::parse("b5").unwrap());
        assert_eq!(pos.get_black().count(), 3);
        assert_eq!(pos.get_white().count(), 0);
        assert!(pos.is_gameover());
        assert_eq!(pos.get_result(), GameResult::BlackWin);
    }

    #[test]
    fn jump_vacates_source() {
        let mut pos = Position::from_fen("x6/7/7/7/7/7/6o x 0 1").unwrap();
        pos.makemove(Move::parse("a7c7").unwrap());
        assert_eq!(pos.get_black().count(), 1);
        assert!(!pos.get_black().contains("a7".parse().unwrap()));
        assert!(pos.get_black().contains("c7".parse().unwrap()));
    }

    #[test]
    fn forced_pass() {
        // Black's lone stone is walled off; white can still play.
        let pos = Position::from_fen("x--4/---4/---4/7/7/7/o6 x 0 1").unwrap();
        assert!(pos.must_pass());
        assert!(!pos.is_gameover());
        assert_eq!(pos.moves(), vec![Move::Pass]);
        assert!(pos.is_legal_move(Move::Pass));
        assert!(!pos.is_legal_move(Move::parse("b7").unwrap()));
    }

    #[test]
    fn gameover_no_pieces() {
        let pos = Position::from_fen("x6/7/7/7/7/7/7 x 0 1").unwrap();
        assert!(pos.is_gameover());
        assert_eq!(pos.get_result(), GameResult::BlackWin);
    }

    #[test]
    fn gameover_board_full() {
        let pos =
            Position::from_fen("xxxxxxx/xxxxxxx/xxxxxxx/xxxxxxx/ooooooo/ooooooo/ooooooo x 0 40")
                .unwrap();
        assert!(pos.is_gameover());
        assert_eq!(pos.material(), 7);
        assert_eq!(pos.get_result(), GameResult::BlackWin);
    }

    #[test]
    fn gameover_halfmove_draw() {
        let pos = Position::from_fen("x5o/7/7/7/7/7/o5x x 100 70").unwrap();
        assert!(pos.is_gameover());
        assert_eq!(pos.get_result(), GameResult::Draw);
    }

    #[test]
    fn ongoing_game_has_no_result() {
        let pos = Position::startpos();
        assert!(!pos.is_gameover());
        assert_eq!(pos.get_result(), GameResult::None);
    }
}
