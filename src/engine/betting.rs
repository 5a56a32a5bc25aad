use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::player::PlayerInHand;
use crate::engine::actions::{Action, ActionType};
use crate::engine::errors::ActionError;

/// Состояние раунда ставок (на конкретной улице).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingState {
    /// Банк раздачи с учётом предыдущих улиц.
    pub pot: Chips,
    /// Текущая целевая ставка, до которой должны дотянуться игроки.
    pub current_bet: Chips,
    /// Минимальный размер повышающей части рейза.
    pub min_raise: Chips,
    pub last_raise_amount: Chips,
    /// Индекс игрока, который ходит.
    pub action_on: usize,
    /// Не сфолдившие игроки.
    pub num_active: usize,
    /// Игроки, которые ещё должны принять решение на этой улице.
    pub num_to_act: usize,
}

/// Раунд ставок над фиксированным списком игроков в порядке мест.
///
/// Порядок хода: по кругу от `first_to_act`; сфолдившие и олл-ин пропускаются.
#[derive(Clone, Debug)]
pub struct BettingRound {
    pub state: BettingState,
    players: Vec<PlayerInHand>,
}

impl BettingRound {
    /// `current_bet` берётся как максимум ставок улицы (блайнды на префлопе, 0 дальше).
    /// `big_blind` задаёт стартовый минимальный рейз.
    pub fn new(players: Vec<PlayerInHand>, first_to_act: usize, pot: Chips, big_blind: Chips) -> Self {
        let current_bet = players
            .iter()
            .map(|p| p.current_bet)
            .max()
            .unwrap_or(Chips::ZERO);
        let min_raise = if big_blind.is_zero() { Chips(1) } else { big_blind };

        let mut round = Self {
            state: BettingState {
                pot,
                current_bet,
                min_raise,
                last_raise_amount: Chips::ZERO,
                action_on: 0,
                num_active: 0,
                num_to_act: 0,
            },
            players,
        };
        round.refresh_counts();
        if !round.players.is_empty() {
            let start = first_to_act % round.players.len();
            round.state.action_on = start;
            if !round.players[start].can_act() {
                round.advance_action();
            }
        }
        round
    }

    pub fn players(&self) -> &[PlayerInHand] {
        &self.players
    }

    pub fn into_players(self) -> Vec<PlayerInHand> {
        self.players
    }

    pub fn pot(&self) -> Chips {
        self.state.pot
    }

    pub fn current_bet(&self) -> Chips {
        self.state.current_bet
    }

    pub fn num_active(&self) -> usize {
        self.state.num_active
    }

    /// Сколько игроков ещё могут делать ставки (не сфолдили и не в олл-ине).
    pub fn num_can_act(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }

    /// Минимальная сумма, ДО которой можно зарейзить.
    pub fn min_raise_to(&self) -> Chips {
        self.state.current_bet + self.state.min_raise
    }

    /// Игрок, от которого ждём решения; None, если раунд завершён.
    pub fn current_player(&self) -> Option<&PlayerInHand> {
        if self.is_complete() {
            return None;
        }
        self.players
            .get(self.state.action_on)
            .filter(|p| p.can_act())
    }

    /// Допустимые действия текущего игрока.
    pub fn valid_actions(&self) -> Vec<ActionType> {
        let Some(player) = self.current_player() else {
            return Vec::new();
        };
        if player.current_bet < self.state.current_bet {
            vec![ActionType::Fold, ActionType::Call, ActionType::Raise]
        } else {
            vec![ActionType::Check, ActionType::Raise]
        }
    }

    /// Применить действие текущего игрока.
    ///
    /// При ошибке состояние не меняется.
    pub fn apply_action(&mut self, action: Action) -> Result<(), ActionError> {
        let valid = self.valid_actions();
        if valid.is_empty() {
            return Err(ActionError::NoPlayerToAct);
        }
        if !valid.contains(&action.action_type()) {
            return Err(ActionError::ActionNotAllowed {
                action: action.action_type(),
                valid,
            });
        }

        let idx = self.state.action_on;
        match action {
            Action::Fold => {
                self.players[idx].is_active = false;
            }
            Action::Check => {}
            Action::Call => {
                let to_call = self.players[idx].to_call(self.state.current_bet);
                let paid = self.players[idx].commit(to_call);
                self.state.pot += paid;
            }
            Action::RaiseTo(amount) => self.apply_raise(idx, amount)?,
        }

        self.players[idx].has_acted = true;
        self.refresh_counts();

        if !self.is_complete() {
            self.advance_action();
        }
        Ok(())
    }

    fn apply_raise(&mut self, idx: usize, amount: Chips) -> Result<(), ActionError> {
        let player = &self.players[idx];
        let wanted = amount.saturating_sub(player.current_bet);

        // Олл-ин допустим всегда, даже ниже минимального рейза.
        let (put_in, raise_to) = if wanted >= player.stack {
            (player.stack, player.current_bet + player.stack)
        } else {
            let min_raise_to = self.min_raise_to();
            if amount < min_raise_to {
                return Err(ActionError::InvalidRaise {
                    amount,
                    min_raise_to,
                });
            }
            (wanted, amount)
        };

        let paid = self.players[idx].commit(put_in);
        self.state.pot += paid;

        if raise_to > self.state.current_bet {
            let raise_amount = raise_to - self.state.current_bet;
            // Неполный олл-ин рейз не меняет шаг минимального рейза.
            if raise_amount >= self.state.min_raise {
                self.state.min_raise = raise_amount;
                self.state.last_raise_amount = raise_amount;
            }
            self.state.current_bet = raise_to;
            self.reopen_action(idx);
        }
        Ok(())
    }

    /// После рейза все остальные активные игроки снова должны ответить.
    fn reopen_action(&mut self, raiser: usize) {
        for (i, p) in self.players.iter_mut().enumerate() {
            if i != raiser && p.can_act() {
                p.has_acted = false;
            }
        }
    }

    fn refresh_counts(&mut self) {
        self.state.num_active = self.players.iter().filter(|p| p.is_active).count();
        let current_bet = self.state.current_bet;
        self.state.num_to_act = self
            .players
            .iter()
            .filter(|p| p.can_act() && (!p.has_acted || p.current_bet < current_bet))
            .count();
    }

    /// Раунд завершён: остался ≤1 активный, либо все, кто может ходить, походили и уравняли.
    pub fn is_complete(&self) -> bool {
        if self.state.num_active <= 1 {
            return true;
        }
        self.players
            .iter()
            .filter(|p| p.can_act())
            .all(|p| p.has_acted && p.current_bet >= self.state.current_bet)
    }

    /// Передать ход следующему игроку, который может действовать.
    /// Если таких нет, ход остаётся на месте.
    pub fn advance_action(&mut self) -> usize {
        let n = self.players.len();
        let start = self.state.action_on;
        for i in 1..=n {
            let idx = (start + i) % n;
            if self.players[idx].can_act() {
                self.state.action_on = idx;
                return idx;
            }
        }
        self.state.action_on
    }
}
