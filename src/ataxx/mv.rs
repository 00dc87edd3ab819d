use crate::ataxx::Bitboard;
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Square(u8);

impl Square {
    pub fn from_index(index: u8) -> Square {
        debug_assert!(index < 49);
        Square(index)
    }

    pub fn from_coords(file: u8, rank: u8) -> Square {
        debug_assert!(file < 7 && rank < 7);
        Square(rank * 7 + file)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn file(self) -> u8 {
        self.0 % 7
    }

    pub fn rank(self) -> u8 {
        self.0 / 7
    }

    pub fn bitboard(self) -> Bitboard {
        Bitboard::from(self)
    }

    pub fn chebyshev_distance(self, other: Square) -> u8 {
        let df = self.file().abs_diff(other.file());
        let dr = self.rank().abs_diff(other.rank());
        df.max(dr)
    }
}

impl FromStr for Square {
    type Err = ();

    fn from_str(s: &str) -> Result<Square, ()> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(());
        };
        if !('a'..='g').contains(&file) || !('1'..='7').contains(&rank) {
            return Err(());
        }
        Ok(Square::from_coords(file as u8 - b'a', rank as u8 - b'1'))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file()) as char,
            (b'1' + self.rank()) as char
        )
    }
}

/// An Ataxx move: a single-square duplication, a two-square jump, or the
/// forced pass "0000".
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Move {
    Pass,
    Single(Square),
    Jump { from: Square, to: Square },
}

impl Move {
    /// Parses engine move notation. A two-square string whose squares are
    /// adjacent names the same move as its destination alone, so it
    /// normalizes to `Single`.
    pub fn parse(s: &str) -> Option<Move> {
        let s = s.trim();
        if !s.is_ascii() {
            return None;
        }
        if s == "0000" {
            return Some(Move::Pass);
        }
        match s.len() {
            2 => Some(Move::Single(s.parse().ok()?)),
            4 => {
                let from: Square = s[..2].parse().ok()?;
                let to: Square = s[2..].parse().ok()?;
                match from.chebyshev_distance(to) {
                    1 => Some(Move::Single(to)),
                    _ => Some(Move::Jump { from, to }),
                }
            }
            _ => None,
        }
    }

}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Pass => write!(f, "0000"),
            Move::Single(to) => write!(f, "{to}"),
            Move::Jump { from, to } => write!(f, "{from}{to}"),
        }
    }
}
