//! Начальная рассадка турнира.
//!
//! Алгоритм воспроизводим по seed:
//!   1) перемешать игроков (Fisher-Yates на ChaCha20);
//!   2) раздать их по столам по кругу;
//!   3) на каждом столе посадить по собственной перемешанной очереди мест.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Chips, SeatIndex, Table, TableId, TournamentError, Wallet, MAX_SEATS};
use crate::infra::{RandomSource, RngSeed};

/// Итог посадки одного игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatAssignment {
    pub wallet: Wallet,
    pub table_id: TableId,
    pub seat_position: SeatIndex,
    pub starting_stack: Chips,
}

#[derive(Clone, Debug)]
pub struct SeatingManager {
    pub max_table_size: usize,
}

impl Default for SeatingManager {
    fn default() -> Self {
        Self::new(MAX_SEATS)
    }
}

impl SeatingManager {
    /// Размер стола ограничен физическими 9 местами.
    pub fn new(max_table_size: usize) -> Self {
        Self {
            max_table_size: max_table_size.clamp(2, MAX_SEATS),
        }
    }

    /// Seed рассадки: SHA256(blockhash || tournament_id || "seating").
    pub fn seating_seed(blockhash: &[u8], tournament_id: &str) -> RngSeed {
        RngSeed::for_seating(blockhash, tournament_id)
    }

    /// Рассадить игроков по столам `table_1..table_N`.
    pub fn create_seating(
        &self,
        players: &[Wallet],
        starting_stack: Chips,
        seed: &RngSeed,
    ) -> Result<(Vec<Table>, Vec<SeatAssignment>), TournamentError> {
        if players.is_empty() {
            return Err(TournamentError::NotEnoughPlayers {
                registered: 0,
                min_players: 1,
            });
        }

        let shuffled = self.shuffle_players(players, seed);
        let table_count = self.table_count(players.len());

        let mut tables: Vec<Table> = (0..table_count)
            .map(|i| Table::new(format!("table_{}", i + 1)))
            .collect();
        let seat_orders = self.seat_orders(table_count, seed);

        let mut per_table: Vec<Vec<&Wallet>> = vec![Vec::new(); table_count];
        for (i, wallet) in shuffled.iter().enumerate() {
            per_table[i % table_count].push(wallet);
        }

        let mut assignments = Vec::with_capacity(players.len());
        for ((table, wallets), order) in tables.iter_mut().zip(per_table).zip(seat_orders) {
            for (wallet, &position) in wallets.into_iter().zip(order.iter()) {
                if !table.seat_player(wallet, position, starting_stack) {
                    continue;
                }
                assignments.push(SeatAssignment {
                    wallet: wallet.clone(),
                    table_id: table.id.clone(),
                    seat_position: position,
                    starting_stack,
                });
            }
        }

        debug!(
            seed = %seed,
            players = players.len(),
            tables = table_count,
            "initial seating created"
        );
        Ok((tables, assignments))
    }

    /// Минимальное число столов: ceil(n / размер стола).
    pub fn table_count(&self, player_count: usize) -> usize {
        if player_count == 0 {
            return 0;
        }
        player_count.div_ceil(self.max_table_size)
    }

    /// Сколько игроков окажется за каждым столом: 25 -> [9, 8, 8].
    pub fn table_distribution(&self, player_count: usize) -> Vec<usize> {
        let tables = self.table_count(player_count);
        if tables == 0 {
            return Vec::new();
        }
        let base = player_count / tables;
        let remainder = player_count % tables;
        (0..tables)
            .map(|i| base + usize::from(i < remainder))
            .collect()
    }

    fn shuffle_players(&self, players: &[Wallet], seed: &RngSeed) -> Vec<Wallet> {
        let mut shuffled = players.to_vec();
        let mut rng = RngSeed::hash_of(&seed.bytes).to_rng();
        rng.shuffle(&mut shuffled);
        shuffled
    }

    /// Перемешанный порядок мест 0..9 для каждого стола.
    fn seat_orders(&self, table_count: usize, seed: &RngSeed) -> Vec<Vec<SeatIndex>> {
        (0..table_count)
            .map(|idx| {
                let mut positions: Vec<SeatIndex> = (0..MAX_SEATS as SeatIndex).collect();
                let mut rng = seed.derive(&format!("_table_{idx}")).to_rng();
                rng.shuffle(&mut positions);
                positions
            })
            .collect()
    }
}
