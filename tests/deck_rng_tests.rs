// tests/deck_rng_tests.rs
//
// Колода и provably-fair seed.
//
// Проверяем:
//  1) одинаковый seed => одинаковая колода;
//  2) разные seed / номера раздач => разные колоды;
//  3) 52 уникальные карты;
//  4) ошибки выдачи (слишком много карт, отрицательное число);
//  5) seed раздачи = SHA256(blockhash || tournament_id || номер строкой).

use std::collections::HashSet;

use poker_arena::domain::{Card, Deck, DeckError};
use poker_arena::infra::{DeterministicRng, RandomSource, RngSeed};

fn full_deal(mut deck: Deck) -> Vec<Card> {
    deck.deal(52).expect("52 карты должны выдаваться")
}

// ===== DETERMINISM =====

#[test]
fn same_seed_gives_identical_deck() {
    let a = full_deal(Deck::new(b"block_0001"));
    let b = full_deal(Deck::new(b"block_0001"));
    assert_eq!(a, b, "Одинаковый seed обязан давать одинаковую колоду");
}

#[test]
fn different_seeds_give_different_decks() {
    let a = full_deal(Deck::new(b"block_0001"));
    let b = full_deal(Deck::new(b"block_0002"));
    assert_ne!(a, b);
}

#[test]
fn hand_number_changes_the_deck() {
    let a = full_deal(Deck::for_hand(b"hash", "t1", 1));
    let b = full_deal(Deck::for_hand(b"hash", "t1", 2));
    let a_again = full_deal(Deck::for_hand(b"hash", "t1", 1));
    assert_ne!(a, b);
    assert_eq!(a, a_again);
}

#[test]
fn hand_seed_is_hash_of_concatenation() {
    let seed = RngSeed::for_hand(b"hash", "t1", 17);
    assert_eq!(seed, RngSeed::hash_of(b"hasht117"));

    let deck_from_seed = full_deal(Deck::from_seed(&seed));
    let deck_for_hand = full_deal(Deck::for_hand(b"hash", "t1", 17));
    assert_eq!(deck_from_seed, deck_for_hand);
}

#[test]
fn seed_hex_is_64_chars() {
    let seed = RngSeed::for_seating(b"hash", "t1");
    let hex = seed.to_hex();
    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
}

// ===== CONTENT =====

#[test]
fn deck_contains_52_unique_cards() {
    let cards = full_deal(Deck::new(b"unique"));
    let set: HashSet<Card> = cards.iter().copied().collect();
    assert_eq!(set.len(), 52);

    let ordered: HashSet<Card> = Deck::ordered_52().into_iter().collect();
    assert_eq!(set, ordered, "Колода: перестановка стандартных 52 карт");
}

#[test]
fn shuffle_actually_changes_order() {
    let cards = full_deal(Deck::new(b"shuffle"));
    assert_ne!(cards, Deck::ordered_52());
}

#[test]
fn cursor_tracks_dealt_cards() {
    let mut deck = Deck::new(b"cursor");
    assert_eq!(deck.remaining(), 52);

    let first = deck.deal(2).unwrap();
    deck.burn().unwrap();
    let flop = deck.deal(3).unwrap();

    assert_eq!(deck.dealt(), 6);
    assert_eq!(deck.remaining(), 46);
    assert!(flop.iter().all(|c| !first.contains(c)));
}

// ===== ERRORS =====

#[test]
fn dealing_past_the_end_fails() {
    let mut deck = Deck::new(b"errors");
    deck.deal(50).unwrap();
    let err = deck.deal(3).unwrap_err();
    assert_eq!(
        err,
        DeckError::InsufficientCards {
            requested: 3,
            remaining: 2
        }
    );
    // Неудачная выдача ничего не тратит.
    assert_eq!(deck.remaining(), 2);
}

#[test]
fn negative_count_is_rejected() {
    let mut deck = Deck::new(b"errors");
    assert_eq!(deck.deal(-1).unwrap_err(), DeckError::InvalidCount(-1));
    assert_eq!(deck.deal(0).unwrap(), Vec::<Card>::new());
}

// ===== RNG =====

#[test]
fn deterministic_rng_is_reproducible() {
    let mut a = DeterministicRng::from_u64(42);
    let mut b = DeterministicRng::from_u64(42);
    let xs: Vec<usize> = (0..20).map(|_| a.index_up_to(100)).collect();
    let ys: Vec<usize> = (0..20).map(|_| b.index_up_to(100)).collect();
    assert_eq!(xs, ys);
    assert!(xs.iter().all(|&x| x <= 100));
}

#[test]
fn shuffle_keeps_all_elements() {
    let mut rng = RngSeed::hash_of(b"perm").to_rng();
    let mut items: Vec<u32> = (0..30).collect();
    rng.shuffle(&mut items);
    let mut sorted = items.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..30).collect::<Vec<u32>>());
}
