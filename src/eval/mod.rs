//! Модуль оценки силы покерных рук (Texas Hold'em).
//!
//! Основная функция:
//!   `evaluate(hole, community) -> EvaluatedHand`
//!
//! Никакой плавающей точки: одинаковый вход всегда даёт одинаковый результат.

pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;

pub use evaluator::{evaluate, EvalError};
pub use hand_rank::{compare, EvaluatedHand, HandCategory};
