//! RngSeed: криптографический seed для покерного RNG.
//!
//! Все случайности турнира выводятся из внешнего коммитмента (blockhash):
//!   - колода раздачи:  SHA256(blockhash || tournament_id || hand_number)
//!   - рассадка:         SHA256(blockhash || tournament_id || "seating")
//!   - порядок мест:     SHA256(seed || "_table_{idx}")
//!
//! Зная blockhash после турнира, любой может воспроизвести каждую раздачу.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::infra::rng::DeterministicRng;

/// 32-байтовый seed для RNG.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RngSeed {
    pub bytes: [u8; 32],
}

impl RngSeed {
    /// Создать seed из 32 байт.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Seed как SHA256 от произвольных байт.
    pub fn hash_of(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self { bytes }
    }

    /// Seed колоды для конкретной раздачи.
    /// Номер раздачи хэшируется как десятичная строка.
    pub fn for_hand(blockhash: &[u8], tournament_id: &str, hand_number: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(blockhash);
        hasher.update(tournament_id.as_bytes());
        hasher.update(hand_number.to_string().as_bytes());
        Self::from_digest(hasher)
    }

    /// Seed начальной рассадки турнира.
    pub fn for_seating(blockhash: &[u8], tournament_id: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(blockhash);
        hasher.update(tournament_id.as_bytes());
        hasher.update(b"seating");
        Self::from_digest(hasher)
    }

    /// Доменное расширение: SHA256(self || label).
    pub fn derive(&self, label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(self.bytes);
        hasher.update(label.as_bytes());
        Self::from_digest(hasher)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Создать DeterministicRng из seed.
    pub fn to_rng(&self) -> DeterministicRng {
        DeterministicRng::from_seed(self.bytes)
    }

    fn from_digest(hasher: Sha256) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self { bytes }
    }
}

impl fmt::Display for RngSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
