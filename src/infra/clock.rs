// src/infra/clock.rs
//! Источник времени для таймера уровней блайндов.
//!
//! Все временные операции турнира берут "сейчас" через `Clock`, поэтому
//! в тестах время можно двигать руками, не засыпая.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Текущее время в миллисекундах.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Настенные часы (UTC).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Ручные часы: клоны разделяют одно и то же значение времени.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn set_ms(&self, value: u64) {
        self.now_ms.store(value, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta: u64) {
        self.now_ms.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, delta: u64) {
        self.advance_ms(delta.saturating_mul(1_000));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
