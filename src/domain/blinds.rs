// src/domain/blinds.rs

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Один уровень блайндов.
/// Пример: level = 4, SB = 100, BB = 200, ante = 25, duration_minutes = 6.
///
/// Анте платит только большой блайнд, поверх BB.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlindLevel {
    /// Порядковый номер уровня (1, 2, 3, ...).
    pub level: u32,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Размер анте в фишках (0, если нет).
    pub ante: Chips,
    pub duration_minutes: u32,
}

impl BlindLevel {
    pub fn new(level: u32, small_blind: u64, big_blind: u64, ante: u64, duration_minutes: u32) -> Self {
        Self {
            level,
            small_blind: Chips(small_blind),
            big_blind: Chips(big_blind),
            ante: Chips(ante),
            duration_minutes,
        }
    }

    /// Сколько всего платит BB: блайнд + анте.
    pub fn total_bb_payment(&self) -> Chips {
        self.big_blind + self.ante
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_minutes as u64 * 60_000
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.small_blind.is_zero() {
            return Err(format!("BlindLevel {}: small_blind = 0", self.level));
        }
        if self.big_blind < self.small_blind {
            return Err(format!(
                "BlindLevel {}: big_blind ({}) < small_blind ({})",
                self.level, self.big_blind, self.small_blind
            ));
        }
        if self.duration_minutes == 0 {
            return Err(format!("BlindLevel {}: duration_minutes = 0", self.level));
        }
        Ok(())
    }
}

/// Структура уровней блайндов с таймером текущего уровня.
///
/// Время передаётся явно (`now_ms`), поэтому структура не зависит от часов.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlindStructure {
    pub levels: Vec<BlindLevel>,
    #[serde(default)]
    current_level_index: usize,
    #[serde(default)]
    level_started_at_ms: Option<u64>,
}

impl BlindStructure {
    pub fn new(levels: Vec<BlindLevel>) -> Self {
        Self {
            levels,
            current_level_index: 0,
            level_started_at_ms: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.levels.is_empty() {
            return Err("BlindStructure: empty levels".into());
        }

        let mut expected_level = 1u32;
        for lvl in &self.levels {
            lvl.validate()?;
            if lvl.level != expected_level {
                return Err(format!(
                    "BlindStructure: expected level {}, got {}",
                    expected_level, lvl.level
                ));
            }
            expected_level += 1;
        }

        Ok(())
    }

    /// Текущий уровень. Структура без уровней невалидна, поэтому тут fallback на нулевой.
    pub fn current_level(&self) -> BlindLevel {
        self.levels
            .get(self.current_level_index)
            .cloned()
            .unwrap_or_else(|| BlindLevel::new(0, 0, 0, 0, 0))
    }

    pub fn current_level_index(&self) -> usize {
        self.current_level_index
    }

    pub fn level_started_at_ms(&self) -> Option<u64> {
        self.level_started_at_ms
    }

    /// Запустить таймер текущего уровня.
    pub fn start_level(&mut self, now_ms: u64) {
        self.level_started_at_ms = Some(now_ms);
    }

    pub fn is_final_level(&self) -> bool {
        self.current_level_index + 1 >= self.levels.len()
    }

    /// Перейти на следующий уровень, если прошло `duration` текущего.
    /// За один вызов: не больше одного уровня; дальше последнего не уходим.
    pub fn check_level_up(&mut self, now_ms: u64) -> bool {
        let Some(started) = self.level_started_at_ms else {
            return false;
        };
        if self.is_final_level() {
            return false;
        }
        let elapsed = now_ms.saturating_sub(started);
        if elapsed >= self.current_level().duration_ms() {
            self.advance_level(now_ms);
            return true;
        }
        false
    }

    /// Принудительный переход на следующий уровень.
    pub fn advance_level(&mut self, now_ms: u64) -> Option<BlindLevel> {
        if self.is_final_level() {
            return None;
        }
        self.current_level_index += 1;
        self.level_started_at_ms = Some(now_ms);
        Some(self.current_level())
    }

    /// Сколько секунд осталось на текущем уровне (полная длительность, если таймер не запущен).
    pub fn time_remaining(&self, now_ms: u64) -> u64 {
        let duration = self.current_level().duration_ms();
        let remaining_ms = match self.level_started_at_ms {
            None => duration,
            Some(started) => duration.saturating_sub(now_ms.saturating_sub(started)),
        };
        remaining_ms / 1_000
    }

    /// Шаблон по имени: `turbo`, `standard`, `deep_stack`.
    pub fn from_template(name: &str) -> Result<Self, String> {
        match name {
            "turbo" => Ok(Self::turbo()),
            "standard" => Ok(Self::standard()),
            "deep_stack" => Ok(Self::deep_stack()),
            other => Err(format!("Unknown blind template: {other}")),
        }
    }

    /// 12 уровней по 6 минут, анте с 4-го уровня.
    pub fn turbo() -> Self {
        Self::new(vec![
            BlindLevel::new(1, 25, 50, 0, 6),
            BlindLevel::new(2, 50, 100, 0, 6),
            BlindLevel::new(3, 75, 150, 0, 6),
            BlindLevel::new(4, 100, 200, 25, 6),
            BlindLevel::new(5, 150, 300, 25, 6),
            BlindLevel::new(6, 200, 400, 50, 6),
            BlindLevel::new(7, 300, 600, 75, 6),
            BlindLevel::new(8, 400, 800, 100, 6),
            BlindLevel::new(9, 500, 1000, 100, 6),
            BlindLevel::new(10, 700, 1400, 175, 6),
            BlindLevel::new(11, 1000, 2000, 250, 6),
            BlindLevel::new(12, 1500, 3000, 375, 6),
        ])
    }

    pub fn standard() -> Self {
        Self::new(vec![
            BlindLevel::new(1, 25, 50, 0, 10),
            BlindLevel::new(2, 50, 100, 0, 10),
            BlindLevel::new(3, 75, 150, 0, 10),
            BlindLevel::new(4, 100, 200, 25, 10),
            BlindLevel::new(5, 150, 300, 25, 10),
            BlindLevel::new(6, 200, 400, 50, 10),
            BlindLevel::new(7, 300, 600, 75, 10),
            BlindLevel::new(8, 400, 800, 100, 10),
        ])
    }

    /// Длинные уровни, первые четыре без анте.
    pub fn deep_stack() -> Self {
        Self::new(vec![
            BlindLevel::new(1, 25, 50, 0, 15),
            BlindLevel::new(2, 50, 100, 0, 15),
            BlindLevel::new(3, 75, 150, 0, 15),
            BlindLevel::new(4, 100, 200, 0, 15),
            BlindLevel::new(5, 150, 300, 25, 15),
            BlindLevel::new(6, 200, 400, 50, 15),
            BlindLevel::new(7, 300, 600, 75, 15),
            BlindLevel::new(8, 400, 800, 100, 15),
        ])
    }
}
