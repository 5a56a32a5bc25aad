//! Балансировка столов после вылетов и разбор лишних столов.
//!
//! Правила:
//!   1) после каждого раунда раздач проверяем размеры столов;
//!   2) если max - min > 1, пересаживаем одного игрока с самого полного
//!      стола на самый пустой;
//!   3) пересаживаем того, кто следующим сел бы на BB;
//!   4) если игроки помещаются за меньшее число столов, разбираем
//!      самый маленький стол и раскидываем его игроков по остальным.
//!
//! Во время раздачи никого не двигаем: балансировщик вызывается между раундами.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{SeatIndex, Table, TableId, TournamentError, Wallet, MAX_SEATS};

/// Перемещение одного игрока между столами.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableMove {
    pub wallet: Wallet,
    pub from_table: TableId,
    pub from_seat: SeatIndex,
    pub to_table: TableId,
    pub to_seat: SeatIndex,
}

/// Итог `rebalance_until_stable`: применённые перемещения и разобранные столы.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RebalancePlan {
    pub moves: Vec<TableMove>,
    pub broken_tables: Vec<TableId>,
}

impl RebalancePlan {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.broken_tables.is_empty()
    }
}

/// Сбалансированы ли столы: (max - min) <= max_seat_diff.
pub fn is_balanced(counts: &[usize], max_seat_diff: usize) -> bool {
    match (counts.iter().min(), counts.iter().max()) {
        (Some(min), Some(max)) => max - min <= max_seat_diff,
        _ => true,
    }
}

/// Минимальное число столов для `total_players` игроков.
pub fn optimal_table_count(total_players: usize) -> usize {
    total_players.div_ceil(MAX_SEATS)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TableBalancer;

impl TableBalancer {
    pub fn new() -> Self {
        Self
    }

    /// Нужна ли пересадка: разница размеров столов больше 1.
    pub fn check_balance_needed(&self, tables: &[Table]) -> bool {
        if tables.len() < 2 {
            return false;
        }
        let counts: Vec<usize> = tables.iter().map(Table::player_count).collect();
        !is_balanced(&counts, 1)
    }

    /// Следующая пересадка, если столы разбалансированы.
    pub fn get_move(&self, tables: &[Table]) -> Option<TableMove> {
        if !self.check_balance_needed(tables) {
            return None;
        }
        let source = fullest_table(tables)?;
        let dest = emptiest_table(tables)?;

        let wallet = match source.next_big_blind_player() {
            Some(w) => w.to_string(),
            None => source.active_players().first()?.wallet.clone()?,
        };
        let from_seat = source.player_seat(&wallet)?.position;
        let to_seat = self.best_available_seat(dest)?;

        Some(TableMove {
            wallet,
            from_table: source.id.clone(),
            from_seat,
            to_table: dest.id.clone(),
            to_seat,
        })
    }

    /// Свободное место, по возможности не два места слева от кнопки
    /// (они скоро станут блайндами). Эвристика: кнопка может перескочить
    /// освободившиеся места.
    pub fn best_available_seat(&self, table: &Table) -> Option<SeatIndex> {
        let available = table.available_seats();
        let button = table.button_position as usize;
        let avoid = [
            ((button + 1) % MAX_SEATS) as SeatIndex,
            ((button + 2) % MAX_SEATS) as SeatIndex,
        ];
        available
            .iter()
            .copied()
            .find(|pos| !avoid.contains(pos))
            .or_else(|| available.first().copied())
    }

    /// Индекс стола, который пора разобрать: самый маленький, если все
    /// игроки помещаются за меньшее число столов.
    pub fn should_break_table(&self, tables: &[Table]) -> Option<usize> {
        if tables.len() <= 1 {
            return None;
        }
        let total: usize = tables.iter().map(Table::player_count).sum();
        if optimal_table_count(total) >= tables.len() {
            return None;
        }
        tables
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| t.player_count())
            .map(|(idx, _)| idx)
    }

    /// Перемещения, которые разбирают стол `break_idx`.
    ///
    /// Каждого игрока сажаем за стол, где сейчас меньше всего игроков,
    /// с учётом уже запланированных пересадок.
    pub fn break_table(&self, tables: &[Table], break_idx: usize) -> Vec<TableMove> {
        let Some(broken) = tables.get(break_idx) else {
            return Vec::new();
        };
        let mut remaining: Vec<Table> = tables
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != break_idx)
            .map(|(_, t)| t.clone())
            .collect();
        if remaining.is_empty() {
            return Vec::new();
        }

        let mut moves = Vec::new();
        for seat in broken.active_players() {
            let Some(wallet) = seat.wallet.as_ref() else {
                continue;
            };
            let Some(dest) = remaining
                .iter_mut()
                .filter(|t| !t.available_seats().is_empty())
                .min_by_key(|t| t.player_count())
            else {
                break;
            };
            let Some(to_seat) = self.best_available_seat(dest) else {
                continue;
            };
            dest.seat_player(wallet, to_seat, seat.stack);
            moves.push(TableMove {
                wallet: wallet.clone(),
                from_table: broken.id.clone(),
                from_seat: seat.position,
                to_table: dest.id.clone(),
                to_seat,
            });
        }
        moves
    }

    /// Выполнить пересадку, сохранив стек игрока.
    pub fn apply_move(&self, tables: &mut [Table], mv: &TableMove) -> Result<(), TournamentError> {
        let from = table_index(tables, &mv.from_table)
            .ok_or_else(|| TournamentError::InvalidMove(format!("unknown table {}", mv.from_table)))?;
        let to = table_index(tables, &mv.to_table)
            .ok_or_else(|| TournamentError::InvalidMove(format!("unknown table {}", mv.to_table)))?;

        let stack = tables[from]
            .player_seat(&mv.wallet)
            .filter(|s| s.is_playing())
            .map(|s| s.stack)
            .ok_or_else(|| {
                TournamentError::InvalidMove(format!(
                    "player {} is not playing at {}",
                    mv.wallet, mv.from_table
                ))
            })?;

        tables[from].remove_player(&mv.wallet);
        if !tables[to].seat_player(&mv.wallet, mv.to_seat, stack) {
            // Место занято: возвращаем игрока обратно.
            tables[from].seat_player(&mv.wallet, mv.from_seat, stack);
            return Err(TournamentError::InvalidMove(format!(
                "seat {} at {} is taken",
                mv.to_seat, mv.to_table
            )));
        }

        debug!(
            wallet = %mv.wallet,
            from = %mv.from_table,
            to = %mv.to_table,
            seat = mv.to_seat,
            "player moved"
        );
        Ok(())
    }

    /// Разбирать и балансировать, пока есть что делать.
    ///
    /// Разобранные (опустевшие) столы удаляются из `tables`.
    pub fn rebalance_until_stable(&self, tables: &mut Vec<Table>) -> RebalancePlan {
        let mut plan = RebalancePlan::default();
        let total: usize = tables.iter().map(Table::player_count).sum();
        let mut budget = total + tables.len() + 1;

        while budget > 0 {
            budget -= 1;

            if let Some(idx) = self.should_break_table(tables) {
                let table_id = tables[idx].id.clone();
                let moves = self.break_table(tables, idx);
                for mv in &moves {
                    if self.apply_move(tables, mv).is_ok() {
                        plan.moves.push(mv.clone());
                    }
                }
                if tables[idx].player_count() == 0 {
                    tables.remove(idx);
                    info!(table_id = %table_id, "table broken");
                    plan.broken_tables.push(table_id);
                    continue;
                }
            }

            match self.get_move(tables) {
                Some(mv) => {
                    if self.apply_move(tables, &mv).is_err() {
                        break;
                    }
                    plan.moves.push(mv);
                }
                None => break,
            }
        }
        plan
    }
}

fn table_index(tables: &[Table], id: &str) -> Option<usize> {
    tables.iter().position(|t| t.id == id)
}

/// Самый полный стол (при равенстве первый).
fn fullest_table(tables: &[Table]) -> Option<&Table> {
    tables.iter().rev().max_by_key(|t| t.player_count())
}

/// Самый пустой стол (при равенстве первый).
fn emptiest_table(tables: &[Table]) -> Option<&Table> {
    tables.iter().min_by_key(|t| t.player_count())
}
