use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{SeatIndex, Wallet};

/// Состояние игрока внутри одной раздачи.
///
/// Создаётся из места за столом в начале раздачи, живёт до её конца;
/// итоговый стек затем записывается обратно в `Seat`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerInHand {
    pub wallet: Wallet,
    pub seat: SeatIndex,
    pub stack: Chips,
    /// Ставка на текущей улице.
    pub current_bet: Chips,
    /// Сколько всего игрок внёс в банк за раздачу (все улицы + анте).
    pub total_contributed: Chips,
    /// false после фолда.
    pub is_active: bool,
    pub is_all_in: bool,
    pub has_acted: bool,
    pub hole_cards: Vec<Card>,
}

impl PlayerInHand {
    pub fn new(wallet: impl Into<Wallet>, seat: SeatIndex, stack: Chips) -> Self {
        Self {
            wallet: wallet.into(),
            seat,
            stack,
            current_bet: Chips::ZERO,
            total_contributed: Chips::ZERO,
            is_active: true,
            is_all_in: false,
            has_acted: false,
            hole_cards: Vec::new(),
        }
    }

    /// Может ли игрок ещё принимать решения (не сфолдил и не в олл-ине).
    pub fn can_act(&self) -> bool {
        self.is_active && !self.is_all_in
    }

    /// Сколько игроку нужно доставить до `current_bet`.
    pub fn to_call(&self, current_bet: Chips) -> Chips {
        current_bet.saturating_sub(self.current_bet)
    }

    /// Поставить `amount` (обрезается по стеку) в текущую улицу.
    /// Возвращает фактически поставленную сумму.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.current_bet += paid;
        self.total_contributed += paid;
        if self.stack.is_zero() {
            self.is_all_in = true;
        }
        paid
    }

    /// Мёртвые фишки (анте): идут в банк, но не в ставку улицы.
    pub fn commit_dead(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.total_contributed += paid;
        if self.stack.is_zero() {
            self.is_all_in = true;
        }
        paid
    }

    /// Сброс ставки улицы перед следующей улицей.
    pub fn reset_for_street(&mut self) {
        self.current_bet = Chips::ZERO;
        self.has_acted = false;
    }
}
