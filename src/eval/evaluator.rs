use thiserror::Error;

use crate::domain::card::{Card, Rank};

use super::hand_rank::{EvaluatedHand, HandCategory};
use super::lookup_tables::{detect_straight, rank_to_bit, straight_values, RankMask};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Для оценки нужно от 5 до 7 карт, получено {0}")]
    WrongCardCount(usize),

    #[error("Карта {0} встречается дважды")]
    DuplicateCard(Card),
}

/// Главная функция: вычислить лучшую 5-карточную руку из hole + community.
///
/// Работает для любых 5–7 карт (флоп, тёрн, ривер).
pub fn evaluate(hole: &[Card], community: &[Card]) -> Result<EvaluatedHand, EvalError> {
    let mut all_cards = Vec::with_capacity(hole.len() + community.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(community);

    if !(5..=7).contains(&all_cards.len()) {
        return Err(EvalError::WrongCardCount(all_cards.len()));
    }
    for (i, card) in all_cards.iter().enumerate() {
        if all_cards[i + 1..].contains(card) {
            return Err(EvalError::DuplicateCard(*card));
        }
    }

    Ok(best_of_all_5card_combinations(&all_cards))
}

/// Перебираем все комбинации 5 карт из N (N=5–7) и выбираем лучшую.
fn best_of_all_5card_combinations(cards: &[Card]) -> EvaluatedHand {
    let n = cards.len();

    let mut best = evaluate_5card_hand(&[cards[0], cards[1], cards[2], cards[3], cards[4]]);

    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let hand = evaluate_5card_hand(&five);
                        if hand > best {
                            best = hand;
                        }
                    }
                }
            }
        }
    }

    best
}

/// Группа карт одного ранга.
#[derive(Clone, Copy)]
struct RankCount {
    rank: Rank,
    count: u8,
}

/// Оценка строго 5-карточной комбинации.
fn evaluate_5card_hand(cards: &[Card; 5]) -> EvaluatedHand {
    let mut suit_counts = [0u8; 4];
    let mut rank_counts = [0u8; 13];
    let mut rank_mask: RankMask = 0;

    for card in cards.iter() {
        suit_counts[card.suit.index()] += 1;
        rank_counts[card.rank.value() as usize] += 1;
        rank_mask |= rank_to_bit(card.rank);
    }

    let is_flush = suit_counts.iter().any(|&c| c == 5);
    let straight_high = detect_straight(rank_mask);

    // Группы (rank, count): сначала по количеству, затем по рангу (обе по убыванию).
    let mut groups: Vec<RankCount> = Rank::ALL
        .iter()
        .rev()
        .filter_map(|&rank| {
            let count = rank_counts[rank.value() as usize];
            (count > 0).then_some(RankCount { rank, count })
        })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| b.rank.cmp(&a.rank)));

    let pattern: Vec<u8> = groups.iter().map(|g| g.count).collect();
    let values: Vec<i8> = groups.iter().map(|g| g.rank.value()).collect();
    let top = |i: usize| groups[i].rank;

    if let (true, Some(high)) = (is_flush, straight_high) {
        let cards_used = straight_cards(cards, high);
        if high == Rank::Ace {
            return EvaluatedHand {
                category: HandCategory::RoyalFlush,
                rank_values: straight_values(high),
                cards_used,
                description: "Royal Flush".to_string(),
            };
        }
        return EvaluatedHand {
            category: HandCategory::StraightFlush,
            rank_values: straight_values(high),
            cards_used,
            description: format!("Straight Flush, {} high", high.name()),
        };
    }

    let grouped = || grouped_cards(cards, &groups);

    match pattern.as_slice() {
        [4, 1] => {
            return EvaluatedHand {
                category: HandCategory::FourOfAKind,
                rank_values: values,
                cards_used: grouped(),
                description: format!("Four of a Kind, {}", top(0).plural()),
            }
        }
        [3, 2] => {
            return EvaluatedHand {
                category: HandCategory::FullHouse,
                rank_values: values,
                cards_used: grouped(),
                description: format!(
                    "Full House, {} full of {}",
                    top(0).plural(),
                    top(1).plural()
                ),
            }
        }
        _ => {}
    }

    if is_flush {
        return EvaluatedHand {
            category: HandCategory::Flush,
            rank_values: values,
            cards_used: grouped(),
            description: format!("Flush, {} high", top(0).name()),
        };
    }

    if let Some(high) = straight_high {
        return EvaluatedHand {
            category: HandCategory::Straight,
            rank_values: straight_values(high),
            cards_used: straight_cards(cards, high),
            description: format!("Straight, {} high", high.name()),
        };
    }

    let (category, description) = match pattern.as_slice() {
        [3, 1, 1] => (
            HandCategory::ThreeOfAKind,
            format!("Three of a Kind, {}", top(0).plural()),
        ),
        [2, 2, 1] => (
            HandCategory::TwoPair,
            format!("Two Pair, {} and {}", top(0).plural(), top(1).plural()),
        ),
        [2, 1, 1, 1] => (HandCategory::Pair, format!("Pair of {}", top(0).plural())),
        _ => (HandCategory::HighCard, format!("{} high", top(0).name())),
    };

    EvaluatedHand {
        category,
        rank_values: values,
        cards_used: grouped(),
        description,
    }
}

/// Карты в порядке групп: сначала старшая группа (каре, сет, пара), потом кикеры.
fn grouped_cards(cards: &[Card; 5], groups: &[RankCount]) -> Vec<Card> {
    groups
        .iter()
        .flat_map(|g| cards.iter().filter(move |c| c.rank == g.rank).copied())
        .collect()
}

/// Карты стрита от старшей к младшей; в wheel туз идёт последним.
fn straight_cards(cards: &[Card; 5], high: Rank) -> Vec<Card> {
    let mut out = cards.to_vec();
    out.sort_by(|a, b| b.rank.cmp(&a.rank));
    if high == Rank::Five {
        out.rotate_left(1);
    }
    out
}
