use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::blinds::{BlindLevel, BlindStructure};
use crate::domain::chips::Chips;
use crate::domain::{TournamentId, Wallet};
use crate::tournament::payouts::PayoutError;

/// Фазы жизненного цикла турнира.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TournamentPhase {
    Created,
    Registration,
    Starting,
    InProgress,
    FinalTable,
    HeadsUp,
    Completed,
    Cancelled,
}

impl TournamentPhase {
    /// Турнир уже идёт (раздачи раздаются).
    pub fn is_running(self) -> bool {
        matches!(
            self,
            TournamentPhase::InProgress | TournamentPhase::FinalTable | TournamentPhase::HeadsUp
        )
    }
}

/// Длина внешнего коммитмента в байтах.
pub const BLOCKHASH_LEN: usize = 32;

fn default_max_players() -> usize {
    54
}

fn default_min_players() -> usize {
    2
}

/// Конфигурация турнира.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub tournament_id: TournamentId,
    pub name: String,

    /// Размер стартового стека.
    pub starting_stack: Chips,

    pub blind_structure: BlindStructure,

    /// rank -> points.
    pub payout_structure: BTreeMap<u32, i64>,

    #[serde(default = "default_max_players")]
    pub max_players: usize,

    #[serde(default = "default_min_players")]
    pub min_players: usize,

    /// Внешний коммитмент (blockhash, 32 байта) для provably-fair колоды и рассадки.
    #[serde(with = "hex::serde", default)]
    pub blockhash: Vec<u8>,
}

impl TournamentConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.tournament_id.is_empty() {
            return Err("tournament_id must not be empty".into());
        }
        if self.blockhash.len() != BLOCKHASH_LEN {
            return Err(format!(
                "blockhash must be {BLOCKHASH_LEN} bytes, got {}",
                self.blockhash.len()
            ));
        }
        if self.starting_stack.is_zero() {
            return Err("starting_stack must be > 0".into());
        }
        if self.min_players < 2 {
            return Err(format!("min_players must be >= 2, got {}", self.min_players));
        }
        if self.max_players < self.min_players {
            return Err(format!(
                "max_players ({}) < min_players ({})",
                self.max_players, self.min_players
            ));
        }
        self.blind_structure.validate()
    }
}

/// Зарегистрированный игрок.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRegistration {
    pub wallet: Wallet,
    pub registered_at_ms: u64,
    /// Произвольная метка уровня агента (free / basic / pro); движку безразлична.
    pub tier: String,
}

/// Запись о вылете игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EliminationRecord {
    pub wallet: Wallet,
    pub final_rank: u32,
    /// Номер раздачи (сквозной по турниру), в которой игрок вылетел.
    pub hand_number: u64,
    pub points_won: i64,
}

/// Снимок турнира для UI.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentState {
    pub tournament_id: TournamentId,
    pub phase: TournamentPhase,
    pub registered_players: usize,
    pub active_players: usize,
    pub eliminated_players: usize,
    pub tables_active: usize,
    pub current_blind_level: BlindLevel,
    pub hands_played: u64,
    pub time_elapsed_seconds: u64,
    pub prize_pool: i64,
}

/// Строка таблицы результатов: (кошелёк, место, стек или очки).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Standing {
    pub wallet: Wallet,
    pub rank: u32,
    /// Для играющих: стек, для вылетевших: выигранные очки.
    pub value: i64,
    pub eliminated: bool,
}

/// Ошибки турнирного уровня.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Invalid tournament phase, expected {expected:?}, found {found:?}")]
    InvalidPhase {
        expected: TournamentPhase,
        found: TournamentPhase,
    },

    #[error("Tournament is full: max_players={max_players}")]
    TournamentFull { max_players: usize },

    #[error("Player {wallet} is already registered")]
    AlreadyRegistered { wallet: Wallet },

    #[error("Player {wallet} is not registered")]
    NotRegistered { wallet: Wallet },

    #[error("Not enough players to start: registered={registered}, min_players={min_players}")]
    NotEnoughPlayers { registered: usize, min_players: usize },

    #[error("Invalid tournament config: {0}")]
    InvalidConfig(String),

    #[error("Invalid table move: {0}")]
    InvalidMove(String),

    #[error("Tournament stalled: no hand completed in {rounds} consecutive rounds")]
    Stalled { rounds: u32 },

    #[error(transparent)]
    Payout(#[from] PayoutError),
}
