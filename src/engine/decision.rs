//! Шов между движком и агентами: наблюдаемое состояние раздачи и
//! асинхронный источник решений.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Card, Chips, HandId, HandPhase, SeatIndex, Wallet};
use crate::engine::actions::{Action, ActionType};

/// Что видит игрок за столом (без чужих карманных карт).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub wallet: Wallet,
    pub stack: Chips,
    pub current_bet: Chips,
    pub is_active: bool,
    pub is_all_in: bool,
    pub seat: SeatIndex,
}

/// Наблюдаемое состояние раздачи в момент запроса решения.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandState {
    pub hand_id: HandId,
    pub phase: HandPhase,
    pub pot: Chips,
    pub community_cards: Vec<Card>,
    pub current_bet: Chips,
    /// Кошелёк игрока, от которого ждём действие.
    pub action_on: Option<Wallet>,
    pub players: Vec<PlayerView>,
    pub valid_actions: Vec<ActionType>,
    pub min_raise_to: Chips,
    /// Карманные карты игрока, которому адресован запрос.
    pub hole_cards: Vec<Card>,
}

impl HandState {
    pub fn can(&self, action: ActionType) -> bool {
        self.valid_actions.contains(&action)
    }

    /// Вид игрока, от которого ждём действие.
    pub fn acting_player(&self) -> Option<&PlayerView> {
        let wallet = self.action_on.as_deref()?;
        self.players.iter().find(|p| p.wallet == wallet)
    }

    /// Сколько нужно доставить, чтобы уравнять.
    pub fn to_call(&self) -> Chips {
        self.acting_player()
            .map(|p| self.current_bet.saturating_sub(p.current_bet))
            .unwrap_or(Chips::ZERO)
    }
}

/// Самое консервативное допустимое действие: check, если можно, иначе fold.
pub fn safe_fallback(state: &HandState) -> Action {
    if state.can(ActionType::Check) {
        Action::Check
    } else {
        Action::Fold
    }
}

/// Источник решений (AI-агент, скриптовый бот, человек).
///
/// Движок ждёт ответа без удержания блокировок; таймауты: забота реализации.
#[async_trait]
pub trait DecisionSource: Send + Sync {
    async fn decide(&self, wallet: &str, state: &HandState) -> Action;
}

/// Обёртка над синхронным замыканием.
pub struct FnDecisionSource<F>(pub F);

#[async_trait]
impl<F> DecisionSource for FnDecisionSource<F>
where
    F: Fn(&str, &HandState) -> Action + Send + Sync,
{
    async fn decide(&self, wallet: &str, state: &HandState) -> Action {
        (self.0)(wallet, state)
    }
}

/// Check, если можно, иначе call. Никогда не фолдит и не рейзит.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassiveDecisionSource;

#[async_trait]
impl DecisionSource for PassiveDecisionSource {
    async fn decide(&self, _wallet: &str, state: &HandState) -> Action {
        if state.can(ActionType::Check) {
            Action::Check
        } else {
            Action::Call
        }
    }
}

/// Check, если можно, иначе fold.
#[derive(Clone, Copy, Debug, Default)]
pub struct FoldingDecisionSource;

#[async_trait]
impl DecisionSource for FoldingDecisionSource {
    async fn decide(&self, _wallet: &str, state: &HandState) -> Action {
        safe_fallback(state)
    }
}
