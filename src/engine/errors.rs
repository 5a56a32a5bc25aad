use thiserror::Error;

use crate::domain::{Chips, DeckError};
use crate::engine::actions::ActionType;
use crate::eval::EvalError;

/// Недопустимое действие в раунде ставок.
///
/// Не фатально: оркестратор раздачи заменяет такое действие на check/fold.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Нет игрока, который может действовать")]
    NoPlayerToAct,

    #[error("Действие {action} недопустимо, допустимы: {valid:?}")]
    ActionNotAllowed {
        action: ActionType,
        valid: Vec<ActionType>,
    },

    #[error("Рейз до {amount} меньше минимального рейза до {min_raise_to}")]
    InvalidRaise { amount: Chips, min_raise_to: Chips },
}

/// Фатальные ошибки раздачи: баг оркестратора, а не действие агента.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandError {
    #[error("Недостаточно игроков для раздачи: {0}")]
    NotEnoughPlayers(usize),

    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}
