use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Chips;

/// Тип действия игрока (без суммы): то, что попадает в список допустимых действий.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Fold,
    Check,
    Call,
    Raise,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionType::Fold => "fold",
            ActionType::Check => "check",
            ActionType::Call => "call",
            ActionType::Raise => "raise",
        };
        f.write_str(s)
    }
}

/// Решение агента.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", content = "amount", rename_all = "snake_case")]
pub enum Action {
    Fold,
    Check,
    Call,
    /// Рейз ДО указанной суммы ставки на улице (не "на" сумму).
    RaiseTo(Chips),
}

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self {
            Action::Fold => ActionType::Fold,
            Action::Check => ActionType::Check,
            Action::Call => ActionType::Call,
            Action::RaiseTo(_) => ActionType::Raise,
        }
    }
}
