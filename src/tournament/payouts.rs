//! Распределение очков по итоговым местам.
//!
//! Структура выплат задаётся админом турнира целиком: `rank -> points`.
//! Никакой формулы нет, только проверка корректности.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Wallet;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayoutError {
    #[error("Payout structure is empty")]
    Empty,

    #[error("Payout ranks must start at 1 and be consecutive, got rank {rank} at position {position}")]
    NonConsecutiveRanks { rank: u32, position: u32 },

    #[error("Payout for rank {rank} is negative: {points}")]
    NegativePoints { rank: u32, points: i64 },

    #[error("Payout for rank {rank} ({points}) exceeds the payout for the rank above ({previous})")]
    IncreasingPoints { rank: u32, points: i64, previous: i64 },

    #[error("Unknown payout fixture: {0}")]
    UnknownFixture(String),
}

/// Очки, начисленные игроку за итоговое место.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PointsAward {
    pub wallet: Wallet,
    /// 1 = победитель.
    pub rank: u32,
    pub points: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayoutCalculator {
    structure: BTreeMap<u32, i64>,
}

impl PayoutCalculator {
    /// Проверенная структура выплат.
    pub fn new(structure: BTreeMap<u32, i64>) -> Result<Self, PayoutError> {
        validate(&structure)?;
        Ok(Self { structure })
    }

    /// Структура из набора примеров по имени.
    pub fn fixture(name: &str) -> Result<Self, PayoutError> {
        Self::new(payout_fixture(name)?)
    }

    pub fn structure(&self) -> &BTreeMap<u32, i64> {
        &self.structure
    }

    /// Награды игрокам в призовых местах, по возрастанию места.
    pub fn calculate(&self, final_rankings: &[(Wallet, u32)]) -> Vec<PointsAward> {
        let mut awards: Vec<PointsAward> = final_rankings
            .iter()
            .filter_map(|(wallet, rank)| {
                self.structure.get(rank).map(|&points| PointsAward {
                    wallet: wallet.clone(),
                    rank: *rank,
                    points,
                })
            })
            .collect();
        awards.sort_by_key(|a| a.rank);
        awards
    }

    pub fn points_for(&self, rank: u32) -> i64 {
        self.structure.get(&rank).copied().unwrap_or(0)
    }

    pub fn total_points(&self) -> i64 {
        self.structure.values().sum()
    }

    pub fn paying_positions(&self) -> usize {
        self.structure.len()
    }
}

/// Места 1..N подряд, очки неотрицательные и не растут с местом.
pub fn validate(structure: &BTreeMap<u32, i64>) -> Result<(), PayoutError> {
    if structure.is_empty() {
        return Err(PayoutError::Empty);
    }
    let mut previous: Option<i64> = None;
    for (position, (&rank, &points)) in (1u32..).zip(structure.iter()) {
        if rank != position {
            return Err(PayoutError::NonConsecutiveRanks { rank, position });
        }
        if points < 0 {
            return Err(PayoutError::NegativePoints { rank, points });
        }
        if let Some(prev) = previous {
            if points > prev {
                return Err(PayoutError::IncreasingPoints {
                    rank,
                    points,
                    previous: prev,
                });
            }
        }
        previous = Some(points);
    }
    Ok(())
}

/// Примеры структур для турнира на 27 игроков.
pub fn payout_fixture(name: &str) -> Result<BTreeMap<u32, i64>, PayoutError> {
    let pairs: &[(u32, i64)] = match name {
        "standard_27" => &[(1, 5000), (2, 3000), (3, 2000), (4, 1000), (5, 500), (6, 500)],
        "top_heavy_27" => &[(1, 8000), (2, 3000), (3, 1000)],
        "flat_27" => &[
            (1, 2000),
            (2, 1800),
            (3, 1600),
            (4, 1400),
            (5, 1200),
            (6, 1000),
            (7, 800),
            (8, 600),
            (9, 600),
        ],
        other => return Err(PayoutError::UnknownFixture(other.to_string())),
    };
    Ok(pairs.iter().copied().collect())
}
