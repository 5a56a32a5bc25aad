//! Покерный движок одной раздачи: ставки, сайд-поты, шоудаун.
//!
//! Высокоуровневый объект: `HandController`
//! Основные операции:
//!   - `HandController::new` – собрать раздачу из мест стола и уровня блайндов
//!   - `HandController::run` – сыграть её до конца, спрашивая решения у `DecisionSource`

pub mod actions;
pub mod betting;
pub mod decision;
pub mod errors;
pub mod hand_controller;
pub mod hand_history;
pub mod positions;
pub mod side_pots;

pub use actions::{Action, ActionType};
pub use betting::{BettingRound, BettingState};
pub use decision::{
    safe_fallback, DecisionSource, FnDecisionSource, FoldingDecisionSource, HandState,
    PassiveDecisionSource, PlayerView,
};
pub use errors::{ActionError, HandError};
pub use hand_controller::{rank_hands, HandController, HandResult, PlayerConfig};
pub use hand_history::{HandAction, HandActionKind, HandHistory};
pub use side_pots::{Contribution, SidePot};
