use core::fmt;

use serde::{Deserialize, Serialize};

/// Фаза раздачи.
///
/// WAITING → POSTING_BLINDS → DEALING → PREFLOP → FLOP → TURN → RIVER → SHOWDOWN → COMPLETE
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HandPhase {
    Waiting,
    PostingBlinds,
    Dealing,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
}

impl HandPhase {
    /// Следующая улица ставок и сколько карт борда открыть перед ней.
    pub fn next_street(self) -> Option<(HandPhase, i64)> {
        match self {
            HandPhase::Preflop => Some((HandPhase::Flop, 3)),
            HandPhase::Flop => Some((HandPhase::Turn, 1)),
            HandPhase::Turn => Some((HandPhase::River, 1)),
            _ => None,
        }
    }

    pub fn is_betting_street(self) -> bool {
        matches!(
            self,
            HandPhase::Preflop | HandPhase::Flop | HandPhase::Turn | HandPhase::River
        )
    }
}

impl fmt::Display for HandPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandPhase::Waiting => "waiting",
            HandPhase::PostingBlinds => "posting_blinds",
            HandPhase::Dealing => "dealing",
            HandPhase::Preflop => "preflop",
            HandPhase::Flop => "flop",
            HandPhase::Turn => "turn",
            HandPhase::River => "river",
            HandPhase::Showdown => "showdown",
            HandPhase::Complete => "complete",
        };
        f.write_str(s)
    }
}
