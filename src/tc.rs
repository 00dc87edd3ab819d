use crate::ataxx::Side;
use regex::{Match, Regex};
use std::{fmt, time::Duration};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Expiry {
    None,
    Black,
    White,
}

impl Expiry {
    fn of(side: Side) -> Expiry {
        match side {
            Side::Black => Expiry::Black,
            Side::White => Expiry::White,
        }
    }
}

/// The time-control seed for a game. Only `Time` and `Movetime` carry
/// clock semantics; the rest are forwarded to the engine untouched.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchSettings {
    #[default]
    Infinite,
    Depth(u32),
    Nodes(u64),
    Movetime(Duration),
    Time {
        btime: i64,
        wtime: i64,
        binc: i64,
        winc: i64,
    },
}

impl SearchSettings {
    pub fn fischer(base: Duration, increment: Duration) -> SearchSettings {
        SearchSettings::Time {
            btime: base.as_millis() as i64,
            wtime: base.as_millis() as i64,
            binc: increment.as_millis() as i64,
            winc: increment.as_millis() as i64,
        }
    }

    pub fn parse(s: &str) -> Option<SearchSettings> {
        None.or_else(|| Self::try_parse_fischer(s))
            .or_else(|| Self::try_parse_movetime(s))
            .or_else(|| Self::try_parse_nodes(s))
            .or_else(|| Self::try_parse_depth(s))
            .or_else(|| (s == "infinite").then_some(SearchSettings::Infinite))
    }

    fn try_parse_fischer(s: &str) -> Option<SearchSettings> {
        let re =
            Regex::new(r"^(?:(?<min>[0-9.]+)[:m])?(?:(?<sec>[0-9.]+)s?)?(?:\+(?<incr>[0-9.]+)s?)?$")
                .unwrap();

        let captures = re.captures(s)?;
        let min = captures.name("min");
        let sec = captures.name("sec");
        let incr = captures.name("incr");
        if min.is_none() && sec.is_none() {
            return None;
        }

        let to_float = |x: Option<Match>| x.map_or("0", |m| m.as_str()).parse::<f64>();
        let min = to_float(min).ok()?;
        let sec = to_float(sec).ok()?;
        let incr = to_float(incr).ok()?;

        let base = min * 60.0 + sec;

        Some(SearchSettings::fischer(
            Duration::from_millis((base * 1000.0) as u64),
            Duration::from_millis((incr * 1000.0) as u64),
        ))
    }

    fn try_parse_movetime(s: &str) -> Option<SearchSettings> {
        let re = Regex::new(r"^movetime=([0-9.]+)s?$").unwrap();

        let captures = re.captures(s)?;
        let (_, [movetime]) = captures.extract();

        let movetime = movetime.parse::<f64>().ok()?;

        Some(SearchSettings::Movetime(Duration::from_millis(
            (movetime * 1000.0) as u64,
        )))
    }

    fn try_parse_nodes(s: &str) -> Option<SearchSettings> {
        let re = Regex::new(r"^(?:N|nodes)=([0-9]+)$").unwrap();

        let captures = re.captures(s)?;
        let (_, [nodes]) = captures.extract();

        Some(SearchSettings::Nodes(nodes.parse().ok()?))
    }

    fn try_parse_depth(s: &str) -> Option<SearchSettings> {
        let re = Regex::new(r"^depth=([0-9]+)$").unwrap();

        let captures = re.captures(s)?;
        let (_, [depth]) = captures.extract();

        Some(SearchSettings::Depth(depth.parse().ok()?))
    }
}

impl fmt::Display for SearchSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchSettings::Infinite => write!(f, "infinite")?,
            SearchSettings::Depth(depth) => write!(f, "depth={depth}")?,
            SearchSettings::Nodes(nodes) => write!(f, "N={nodes}")?,
            SearchSettings::Movetime(duration) => {
                write!(f, "movetime={}s", duration.as_secs_f64())?
            }
            SearchSettings::Time { btime, binc, .. } => {
                let seconds = *btime as f64 / 1000.0;

                let minutes = (seconds / 60.0).floor() as i64;
                let seconds = seconds - minutes as f64 * 60.0;

                if minutes > 0 {
                    write!(f, "{minutes}m")?
                }
                if seconds > 0.0 || minutes == 0 {
                    write!(f, "{seconds}s")?
                }
                if *binc > 0 {
                    write!(f, "+{}s", *binc as f64 / 1000.0)?
                }
            }
        }
        Ok(())
    }
}

/// Per-game clock state. In `Time` mode the two remaining times tick down
/// as moves complete; the other modes keep no state here.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct GameClock {
    tc: SearchSettings,
    btime: i64,
    wtime: i64,
}

impl GameClock {
    pub fn new(tc: &SearchSettings) -> GameClock {
        let (btime, wtime) = match tc {
            SearchSettings::Time { btime, wtime, .. } => (*btime, *wtime),
            _ => (0, 0),
        };
        GameClock {
            tc: *tc,
            btime,
            wtime,
        }
    }

    /// Charges a completed move to the mover's clock. The increment is
    /// applied separately, after the expiry check.
    pub fn subtract(&mut self, side: Side, elapsed: Duration) {
        if let SearchSettings::Time { .. } = self.tc {
            match side {
                Side::Black => self.btime -= elapsed.as_millis() as i64,
                Side::White => self.wtime -= elapsed.as_millis() as i64,
            }
        }
    }

    pub fn increment(&mut self, side: Side) {
        if let SearchSettings::Time { binc, winc, .. } = self.tc {
            match side {
                Side::Black => self.btime += binc,
                Side::White => self.wtime += winc,
            }
        }
    }

    /// Checks for a time forfeit after `subtract` and before `increment`.
    /// `Movetime` allows the buffer on top of the movetime; `Time` flags
    /// whichever clock ran out, black first.
    pub fn expired(&self, side: Side, elapsed: Duration, buffer: Duration) -> Expiry {
        match self.tc {
            SearchSettings::Movetime(movetime) => {
                if elapsed > movetime + buffer {
                    Expiry::of(side)
                } else {
                    Expiry::None
                }
            }
            SearchSettings::Time { .. } => {
                if self.btime <= 0 {
                    Expiry::Black
                } else if self.wtime <= 0 {
                    Expiry::White
                } else {
                    Expiry::None
                }
            }
            _ => Expiry::None,
        }
    }

    /// Remaining time of a side, `Time` mode only.
    pub fn time_left(&self, side: Side) -> Option<i64> {
        match self.tc {
            SearchSettings::Time { .. } => Some(match side {
                Side::Black => self.btime,
                Side::White => self.wtime,
            }),
            _ => None,
        }
    }

    /// The argument string for the `go` command, reflecting current clock
    /// state in `Time` mode.
    pub fn go_string(&self) -> String {
        match self.tc {
            SearchSettings::Infinite => String::from("go infinite"),
            SearchSettings::Depth(depth) => format!("go depth {depth}"),
            SearchSettings::Nodes(nodes) => format!("go nodes {nodes}"),
            SearchSettings::Movetime(movetime) => format!("go movetime {}", movetime.as_millis()),
            SearchSettings::Time { binc, winc, .. } => format!(
                "go btime {} wtime {} binc {binc} winc {winc}",
                self.btime, self.wtime
            ),
        }
    }
}
