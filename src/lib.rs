//! Турнирный покерный движок для AI-агентов.
//!
//! Слои:
//!   - `domain` – карты, колода, места, столы, блайнды, конфиг турнира;
//!   - `eval` – оценка силы рук;
//!   - `engine` – одна раздача: ставки, сайд-поты, шоудаун;
//!   - `infra` – provably-fair seed, детерминированный RNG, часы;
//!   - `tournament` – рассадка, балансировка, выплаты, оркестратор.
//!
//! Решения игроков приходят извне через `engine::DecisionSource`.

pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod tournament;

pub use domain::{
    BlindLevel, BlindStructure, Card, Chips, Deck, Table, TournamentConfig, TournamentError,
    TournamentPhase, TournamentState,
};
pub use engine::{Action, DecisionSource, HandController, HandResult, HandState};
pub use eval::{evaluate, EvaluatedHand};
pub use infra::{Clock, ManualClock, RngSeed, SystemClock};
pub use tournament::{PayoutCalculator, PointsAward, TournamentManager};
