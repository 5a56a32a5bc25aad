use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{chips::Chips, PlayerInHand, Wallet};

/// Сайд-пот: часть банка, в которую участвуют только некоторые игроки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidePot {
    pub amount: Chips,
    /// Кто может выиграть этот пот (в порядке мест).
    pub eligible_players: Vec<Wallet>,
}

/// Вклад одного игрока в банк раздачи.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contribution {
    pub wallet: Wallet,
    pub amount: Chips,
    /// false, если игрок сфолдил.
    pub is_active: bool,
    pub is_all_in: bool,
}

impl Contribution {
    pub fn new(wallet: impl Into<Wallet>, amount: u64, is_active: bool, is_all_in: bool) -> Self {
        Self {
            wallet: wallet.into(),
            amount: Chips(amount),
            is_active,
            is_all_in,
        }
    }
}

impl From<&PlayerInHand> for Contribution {
    fn from(p: &PlayerInHand) -> Self {
        Self {
            wallet: p.wallet.clone(),
            amount: p.total_contributed,
            is_active: p.is_active,
            is_all_in: p.is_all_in,
        }
    }
}

/// Посчитать сайд-поты из вкладов игроков.
///
/// Уровни: различные суммы олл-инов по возрастанию. На каждом уровне пот собирает
/// `(level - prev)` с каждого, кто внёс не меньше `level`, и остаток с тех, кто внёс
/// между `prev` и `level`. Сфолдившие участвуют суммой, но не правом на выигрыш.
/// Всё, что выше максимального олл-ина, идёт в последний пот.
///
/// Фишки уровня без претендентов добавляются к предыдущему поту, так что сумма
/// потов всегда равна сумме вкладов.
pub fn calculate(contributions: &[Contribution]) -> Vec<SidePot> {
    let contributors: Vec<&Contribution> = contributions
        .iter()
        .filter(|c| !c.amount.is_zero())
        .collect();
    if contributors.is_empty() {
        return Vec::new();
    }

    let mut levels: Vec<Chips> = contributors
        .iter()
        .filter(|c| c.is_all_in)
        .map(|c| c.amount)
        .collect();
    levels.sort();
    levels.dedup();

    if levels.is_empty() {
        return vec![SidePot {
            amount: contributors.iter().map(|c| c.amount).sum(),
            eligible_players: contributors
                .iter()
                .filter(|c| c.is_active)
                .map(|c| c.wallet.clone())
                .collect(),
        }];
    }

    let mut pots: Vec<SidePot> = Vec::new();
    let mut orphaned = Chips::ZERO;
    let mut prev = Chips::ZERO;

    let top = levels.last().copied().unwrap_or(Chips::ZERO);
    // Последний "уровень": максимальный вклад (остаток над старшим олл-ином).
    let max_contribution = contributors
        .iter()
        .map(|c| c.amount)
        .max()
        .unwrap_or(Chips::ZERO);
    if max_contribution > top {
        levels.push(max_contribution);
    }

    for level in levels {
        let mut amount = Chips::ZERO;
        let mut eligible = Vec::new();
        for c in &contributors {
            if c.amount >= level {
                amount += level - prev;
                if c.is_active {
                    eligible.push(c.wallet.clone());
                }
            } else if c.amount > prev {
                amount += c.amount - prev;
                if c.is_active {
                    eligible.push(c.wallet.clone());
                }
            }
        }

        if !amount.is_zero() {
            if eligible.is_empty() {
                match pots.last_mut() {
                    Some(last) => last.amount += amount,
                    None => orphaned += amount,
                }
            } else {
                pots.push(SidePot {
                    amount: amount + orphaned,
                    eligible_players: eligible,
                });
                orphaned = Chips::ZERO;
            }
        }
        prev = level;
    }

    pots
}

/// Распределить поты по рейтингу рук (меньше: сильнее; равные ранги делят пот).
///
/// Пот делится нацело; лишние фишки по одной получают первые победители в
/// порядке `eligible_players`.
pub fn distribute(pots: &[SidePot], rankings: &HashMap<Wallet, u32>) -> BTreeMap<Wallet, Chips> {
    let mut winnings: BTreeMap<Wallet, Chips> = BTreeMap::new();

    for pot in pots {
        let ranked: Vec<(&Wallet, u32)> = pot
            .eligible_players
            .iter()
            .filter_map(|w| rankings.get(w).map(|r| (w, *r)))
            .collect();
        let Some(best) = ranked.iter().map(|(_, r)| *r).min() else {
            continue;
        };
        let winners: Vec<&Wallet> = ranked
            .iter()
            .filter(|(_, r)| *r == best)
            .map(|(w, _)| *w)
            .collect();

        let share = pot.amount.0 / winners.len() as u64;
        let remainder = pot.amount.0 % winners.len() as u64;

        for (i, wallet) in winners.iter().enumerate() {
            let extra = if (i as u64) < remainder { 1 } else { 0 };
            *winnings.entry((*wallet).clone()).or_insert(Chips::ZERO) += Chips(share + extra);
        }
    }

    winnings
}
