//! Инфраструктурный слой вокруг покерного движка:
//! - детерминированный RNG (ChaCha20) и ручной Fisher-Yates;
//! - provably-fair seed из внешнего коммитмента (blockhash);
//! - источник времени для таймера блайндов.

pub mod clock;
pub mod rng;
pub mod rng_seed;

pub use clock::{Clock, ManualClock, SystemClock};
pub use rng::{DeterministicRng, RandomSource};
pub use rng_seed::RngSeed;
