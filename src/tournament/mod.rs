// src/tournament/mod.rs
//! Мультистоловый турнир: рассадка, балансировка, выплаты и оркестратор.

pub mod manager;
pub mod payouts;
pub mod rebalance;
pub mod seating;

pub use manager::TournamentManager;
pub use payouts::{payout_fixture, PayoutCalculator, PayoutError, PointsAward};
pub use rebalance::{is_balanced, optimal_table_count, RebalancePlan, TableBalancer, TableMove};
pub use seating::{SeatAssignment, SeatingManager};
