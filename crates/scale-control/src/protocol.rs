//! Line protocol spoken between `scalectl` and a running `scale-host`.
//!
//! One command per line: a verb followed by whitespace-separated arguments,
//! e.g. `tap 176 16`, `resize 320 480`, `select none`, `describe-min Not at all`.

use crate::geom::{Point, Size};
use crate::mode::DisplayMode;
use std::fmt;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString, IntoStaticStr};
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/scale-host.sock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay, IntoStaticStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
enum Verb {
    Tap,
    DragBegin,
    DragMove,
    DragEnd,
    DragCancel,
    Resize,
    Min,
    Max,
    Select,
    DescribeMin,
    DescribeMax,
    Mode,
    Dump,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command in '{0}'")]
    UnknownVerb(String),
    #[error("'{verb}' expects {expected} in '{line}'")]
    BadArguments {
        verb: &'static str,
        expected: &'static str,
        line: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Tap(Point),
    DragBegin(Point),
    DragMove(Point),
    DragEnd(Point),
    DragCancel,
    Resize(Size),
    Minimum(i64),
    Maximum(i64),
    Select(Option<i64>),
    DescribeMinimum(Option<String>),
    DescribeMaximum(Option<String>),
    /// `None` hands the choice back to the mode selector.
    Mode(Option<DisplayMode>),
    Dump,
}

impl FromStr for HostCommand {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map(|(h, r)| (h, r.trim()))
            .unwrap_or((line, ""));
        if head.is_empty() {
            return Err(ProtocolError::Empty);
        }
        let verb = Verb::from_str(head).map_err(|_| ProtocolError::UnknownVerb(line.into()))?;

        let bad = |expected: &'static str| ProtocolError::BadArguments {
            verb: verb.into(),
            expected,
            line: line.into(),
        };
        let pair = || -> Option<(f64, f64)> {
            let mut parts = rest.split_whitespace().map(str::parse::<f64>);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(Ok(a)), Some(Ok(b)), None) if a.is_finite() && b.is_finite() => Some((a, b)),
                _ => None,
            }
        };
        let point = || pair().map(|(x, y)| Point::new(x, y)).ok_or_else(|| bad("X Y"));
        let integer = || rest.parse::<i64>().map_err(|_| bad("an integer"));
        let text = || (!rest.is_empty()).then(|| rest.to_string());

        Ok(match verb {
            Verb::Tap => Self::Tap(point()?),
            Verb::DragBegin => Self::DragBegin(point()?),
            Verb::DragMove => Self::DragMove(point()?),
            Verb::DragEnd => Self::DragEnd(point()?),
            Verb::DragCancel => Self::DragCancel,
            Verb::Resize => {
                let (w, h) = pair().ok_or_else(|| bad("WIDTH HEIGHT"))?;
                Self::Resize(Size::new(w, h))
            }
            Verb::Min => Self::Minimum(integer()?),
            Verb::Max => Self::Maximum(integer()?),
            Verb::Select if rest.eq_ignore_ascii_case("none") => Self::Select(None),
            Verb::Select => Self::Select(Some(integer().map_err(|_| bad("an integer or 'none'"))?)),
            Verb::DescribeMin => Self::DescribeMinimum(text()),
            Verb::DescribeMax => Self::DescribeMaximum(text()),
            Verb::Mode if rest.eq_ignore_ascii_case("auto") => Self::Mode(None),
            Verb::Mode => Self::Mode(Some(
                DisplayMode::from_str(rest).map_err(|_| bad("a display mode or 'auto'"))?,
            )),
            Verb::Dump => Self::Dump,
        })
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tap(p) => write!(f, "{} {} {}", Verb::Tap, p.x, p.y),
            Self::DragBegin(p) => write!(f, "{} {} {}", Verb::DragBegin, p.x, p.y),
            Self::DragMove(p) => write!(f, "{} {} {}", Verb::DragMove, p.x, p.y),
            Self::DragEnd(p) => write!(f, "{} {} {}", Verb::DragEnd, p.x, p.y),
            Self::DragCancel => write!(f, "{}", Verb::DragCancel),
            Self::Resize(s) => write!(f, "{} {} {}", Verb::Resize, s.width, s.height),
            Self::Minimum(v) => write!(f, "{} {}", Verb::Min, v),
            Self::Maximum(v) => write!(f, "{} {}", Verb::Max, v),
            Self::Select(Some(v)) => write!(f, "{} {}", Verb::Select, v),
            Self::Select(None) => write!(f, "{} none", Verb::Select),
            Self::DescribeMinimum(text) => {
                write!(f, "{} {}", Verb::DescribeMin, text.as_deref().unwrap_or(""))
            }
            Self::DescribeMaximum(text) => {
                write!(f, "{} {}", Verb::DescribeMax, text.as_deref().unwrap_or(""))
            }
            Self::Mode(Some(mode)) => write!(f, "{} {}", Verb::Mode, mode),
            Self::Mode(None) => write!(f, "{} auto", Verb::Mode),
            Self::Dump => write!(f, "{}", Verb::Dump),
        }
    }
}
