use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;

/// Категория покерной руки по силе.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HandCategory {
    HighCard = 1,
    Pair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

/// Оценённая 5-карточная рука.
///
/// Порядок: сначала категория, затем `rank_values` лексикографически.
/// `cards_used` и `description` в сравнении не участвуют.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluatedHand {
    pub category: HandCategory,
    /// Tie-break кортеж, старшее значение первым. Ранги 0 (двойка) .. 12 (туз).
    pub rank_values: Vec<i8>,
    pub cards_used: Vec<Card>,
    pub description: String,
}

impl PartialEq for EvaluatedHand {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EvaluatedHand {}

impl PartialOrd for EvaluatedHand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EvaluatedHand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.rank_values.cmp(&other.rank_values))
    }
}

/// Сравнение двух рук: -1, 0 или 1.
pub fn compare(a: &EvaluatedHand, b: &EvaluatedHand) -> i8 {
    match a.cmp(b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}
