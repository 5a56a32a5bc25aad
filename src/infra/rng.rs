use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// RNG интерфейс для колоды и рассадки.
///
/// Перемешивание через ручной Fisher-Yates, поэтому порядок карт при одинаковом seed
/// зависит только от этого кода, а не от версии библиотечного алгоритма.
pub trait RandomSource {
    /// Равномерное целое из `0..=upper`.
    fn index_up_to(&mut self, upper: usize) -> usize;

    fn shuffle<T>(&mut self, slice: &mut [T]) {
        if slice.len() < 2 {
            return;
        }
        for i in (1..slice.len()).rev() {
            let j = self.index_up_to(i);
            slice.swap(i, j);
        }
    }
}

/// Детерминированный RNG для колоды, рассадки и реплея.
/// Одинаковый seed => одинаковая последовательность на любой платформе.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: ChaCha20Rng,
}

impl DeterministicRng {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            inner: ChaCha20Rng::from_seed(seed),
        }
    }

    /// Для тестовых ботов и симуляций, где нужен просто "какой-то" seed.
    pub fn from_u64(seed: u64) -> Self {
        Self {
            inner: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Подбросить монету с вероятностью `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen_bool(p.clamp(0.0, 1.0))
    }
}

impl RandomSource for DeterministicRng {
    fn index_up_to(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..=upper)
    }
}
