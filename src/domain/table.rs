use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{SeatIndex, TableId, Wallet};

/// Стандартный турнирный стол на 9 мест.
pub const MAX_SEATS: usize = 9;

/// Фаза стола между раздачами и внутри раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TableState {
    Waiting,
    /// Идёт раздача.
    Betting,
}

/// Статус места.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    Empty,
    Active,
    Eliminated,
    SittingOut,
}

/// Место за столом. Стек переживает раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub position: SeatIndex,
    pub wallet: Option<Wallet>,
    pub stack: Chips,
    /// Участвует ли в текущей раздаче.
    pub is_active: bool,
    pub status: SeatStatus,
}

impl Seat {
    pub fn empty(position: SeatIndex) -> Self {
        Self {
            position,
            wallet: None,
            stack: Chips::ZERO,
            is_active: false,
            status: SeatStatus::Empty,
        }
    }

    /// Место свободно для посадки: пустое или освободившееся после вылета.
    pub fn is_free(&self) -> bool {
        matches!(self.status, SeatStatus::Empty | SeatStatus::Eliminated)
    }

    pub fn is_playing(&self) -> bool {
        self.status == SeatStatus::Active
    }
}

/// Игрок в снимке стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatSnapshot {
    pub wallet: Wallet,
    pub position: SeatIndex,
    pub stack: Chips,
    pub status: SeatStatus,
}

/// Снимок стола для логов и UI.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSnapshot {
    pub table_id: TableId,
    pub button_position: SeatIndex,
    pub state: TableState,
    pub players: Vec<SeatSnapshot>,
}

/// Турнирный стол: 9 мест, кнопка, фаза.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub seats: Vec<Seat>,
    pub button_position: SeatIndex,
    pub state: TableState,
}

impl Table {
    /// Создать пустой стол.
    pub fn new(id: impl Into<TableId>) -> Self {
        Self {
            id: id.into(),
            seats: (0..MAX_SEATS as SeatIndex).map(Seat::empty).collect(),
            button_position: 0,
            state: TableState::Waiting,
        }
    }

    /// Посадить игрока на конкретное место. false, если место занято или вне стола.
    pub fn seat_player(&mut self, wallet: &str, position: SeatIndex, stack: Chips) -> bool {
        let Some(seat) = self.seats.get_mut(position as usize) else {
            return false;
        };
        if !seat.is_free() {
            return false;
        }
        seat.wallet = Some(wallet.to_string());
        seat.stack = stack;
        seat.status = SeatStatus::Active;
        seat.is_active = false;
        true
    }

    /// Убрать игрока со стола (пересадка, разбор стола).
    pub fn remove_player(&mut self, wallet: &str) -> bool {
        match self.player_seat_mut(wallet) {
            Some(seat) => {
                let position = seat.position;
                *seat = Seat::empty(position);
                true
            }
            None => false,
        }
    }

    pub fn player_seat(&self, wallet: &str) -> Option<&Seat> {
        self.seats
            .iter()
            .find(|s| s.wallet.as_deref() == Some(wallet))
    }

    pub fn player_seat_mut(&mut self, wallet: &str) -> Option<&mut Seat> {
        self.seats
            .iter_mut()
            .find(|s| s.wallet.as_deref() == Some(wallet))
    }

    /// Места с играющими игроками (без вылетевших и sitting out).
    pub fn active_players(&self) -> Vec<&Seat> {
        self.seats.iter().filter(|s| s.is_playing()).collect()
    }

    pub fn player_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_playing()).count()
    }

    /// Следующее играющее место после `from` по кругу (не включая `from`).
    fn next_playing_after(&self, from: SeatIndex) -> Option<SeatIndex> {
        (1..=MAX_SEATS)
            .map(|i| ((from as usize + i) % MAX_SEATS) as SeatIndex)
            .find(|&pos| self.seats[pos as usize].is_playing())
    }

    /// Передвинуть кнопку на следующего играющего игрока.
    pub fn advance_button(&mut self) -> SeatIndex {
        if let Some(next) = self.next_playing_after(self.button_position) {
            self.button_position = next;
        }
        self.button_position
    }

    /// Малый блайнд (в хедз-апе кнопка), иначе первый играющий слева от кнопки.
    pub fn small_blind_seat(&self) -> Option<&Seat> {
        let count = self.player_count();
        if count < 2 {
            return None;
        }
        if count == 2 {
            return self.seats.get(self.button_position as usize);
        }
        self.next_playing_after(self.button_position)
            .map(|pos| &self.seats[pos as usize])
    }

    /// Большой блайнд (в хедз-апе не-кнопка), иначе первый играющий слева от SB.
    pub fn big_blind_seat(&self) -> Option<&Seat> {
        let count = self.player_count();
        if count < 2 {
            return None;
        }
        if count == 2 {
            return self
                .seats
                .iter()
                .find(|s| s.is_playing() && s.position != self.button_position);
        }
        let sb = self.small_blind_seat()?.position;
        self.next_playing_after(sb)
            .map(|pos| &self.seats[pos as usize])
    }

    /// Кто будет на большом блайнде в следующей раздаче.
    ///
    /// Симулирует сдвиг кнопки; используется балансировкой, чтобы пересаживать
    /// игрока до того, как он заплатит BB.
    pub fn next_big_blind_player(&self) -> Option<&str> {
        let count = self.player_count();
        if count < 2 {
            return None;
        }
        let next_button = self
            .next_playing_after(self.button_position)
            .unwrap_or(self.button_position);

        let seat = if count == 2 {
            self.seats
                .iter()
                .find(|s| s.is_playing() && s.position != next_button)
        } else {
            let sb = self.next_playing_after(next_button)?;
            let bb = self.next_playing_after(sb)?;
            self.seats.get(bb as usize)
        };
        seat.and_then(|s| s.wallet.as_deref())
    }

    /// Свободные места (пустые или после вылета), по возрастанию.
    pub fn available_seats(&self) -> Vec<SeatIndex> {
        self.seats
            .iter()
            .filter(|s| s.is_free())
            .map(|s| s.position)
            .collect()
    }

    /// Отметить игрока вылетевшим. Кошелёк остаётся на месте до пересадки.
    pub fn eliminate_player(&mut self, wallet: &str) {
        if let Some(seat) = self.player_seat_mut(wallet) {
            seat.status = SeatStatus::Eliminated;
            seat.is_active = false;
            seat.stack = Chips::ZERO;
        }
    }

    pub fn set_stack(&mut self, wallet: &str, stack: Chips) -> bool {
        match self.player_seat_mut(wallet) {
            Some(seat) => {
                seat.stack = stack;
                true
            }
            None => false,
        }
    }

    /// Сумма фишек всех играющих за столом.
    pub fn total_chips(&self) -> Chips {
        self.seats
            .iter()
            .filter(|s| s.is_playing())
            .map(|s| s.stack)
            .sum()
    }

    /// Снимок занятых мест (включая вылетевших, ещё не убранных со стола).
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            table_id: self.id.clone(),
            button_position: self.button_position,
            state: self.state,
            players: self
                .seats
                .iter()
                .filter_map(|s| {
                    s.wallet.as_ref().map(|w| SeatSnapshot {
                        wallet: w.clone(),
                        position: s.position,
                        stack: s.stack,
                        status: s.status,
                    })
                })
                .collect(),
        }
    }
}
