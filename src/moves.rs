use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MoveParseError;

/// One turn as a signed tile sequence.
///
/// `[from, to]` is a simple move. A capture is `[from, -captured, landing, ...]`
/// with the captured tiles negated and every landing in between.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Move(pub Vec<i8>);

impl Move {
    pub fn steps(&self) -> &[i8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Starting tile. Zero for a malformed empty move.
    pub fn from(&self) -> u8 {
        self.0.first().map(|&t| t.unsigned_abs()).unwrap_or(0)
    }

    /// Final landing tile.
    pub fn to(&self) -> u8 {
        self.0.last().map(|&t| t.unsigned_abs()).unwrap_or(0)
    }

    pub fn is_capture(&self) -> bool {
        self.0.iter().any(|&t| t < 0)
    }

    pub fn captured(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().filter(|&&t| t < 0).map(|&t| t.unsigned_abs())
    }

    /// Every tile the piece stands on, origin included.
    pub fn path(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().filter(|&&t| t > 0).map(|&t| t as u8)
    }

    /// Resolve draughts notation ("21-17", "29x22x15") against a list of legal
    /// moves. Two numbers ("11 27") match any move with that origin and final
    /// tile; longer notation must name every landing.
    pub fn from_notation(s: &str, options: &[Move]) -> Result<Move, MoveParseError> {
        let tiles = s
            .split(|c: char| c == '-' || c == 'x' || c == 'X' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u8>()
                    .map_err(|_| MoveParseError::Malformed(s.to_string()))
            })
            .collect::<Result<Vec<u8>, _>>()?;
        if tiles.len() < 2 {
            return Err(MoveParseError::Malformed(s.to_string()));
        }

        let matches: Vec<&Move> = options
            .iter()
            .filter(|m| {
                let path: Vec<u8> = m.path().collect();
                if tiles.len() == 2 {
                    m.from() == tiles[0] && m.to() == tiles[1]
                } else {
                    path == tiles
                }
            })
            .collect();

        match matches.as_slice() {
            [] => Err(MoveParseError::NoMatch(s.to_string())),
            [only] => Ok((*only).clone()),
            _ => Err(MoveParseError::Ambiguous(s.to_string(), matches.len())),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_capture() { "x" } else { "-" };
        let path: Vec<String> = self.path().map(|t| t.to_string()).collect();
        write!(f, "{}", path.join(sep))
    }
}
