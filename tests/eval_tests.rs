// tests/eval_tests.rs
//
// Оценка рук: категории, описания, порядок.

use poker_arena::domain::card::parse_cards;
use poker_arena::domain::Card;
use poker_arena::eval::{compare, evaluate, EvalError, EvaluatedHand, HandCategory};

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).expect("валидная строка карт")
}

/// Оценить 7 карт: "hole | board".
fn eval7(hole: &str, board: &str) -> EvaluatedHand {
    evaluate(&cards(hole), &cards(board)).expect("валидная рука")
}

// ===== CATEGORIES & DESCRIPTIONS =====

#[test]
fn royal_flush() {
    let h = eval7("As Ks", "Qs Js Ts 2d 3c");
    assert_eq!(h.category, HandCategory::RoyalFlush);
    assert_eq!(h.description, "Royal Flush");
    assert_eq!(h.cards_used.len(), 5);
}

#[test]
fn straight_flush() {
    let h = eval7("9h 8h", "7h 6h 5h Ad Ac");
    assert_eq!(h.category, HandCategory::StraightFlush);
    assert_eq!(h.description, "Straight Flush, 9 high");
}

#[test]
fn four_of_a_kind() {
    let h = eval7("Kd Kh", "Ks Kc 2d 3c 4h");
    assert_eq!(h.category, HandCategory::FourOfAKind);
    assert_eq!(h.description, "Four of a Kind, Kings");
    assert_eq!(h.rank_values, vec![11, 2], "Каре королей, кикер четвёрка");
}

#[test]
fn full_house() {
    let h = eval7("Kd Kh", "Ks 2c 2d 7c 9h");
    assert_eq!(h.category, HandCategory::FullHouse);
    assert_eq!(h.description, "Full House, Kings full of Twos");
}

#[test]
fn flush() {
    let h = eval7("Ah 9h", "6h 4h 2h Kd Qc");
    assert_eq!(h.category, HandCategory::Flush);
    assert_eq!(h.description, "Flush, Ace high");
}

#[test]
fn straight_and_wheel_descriptions() {
    let h = eval7("9d 8c", "7h 6s 5d Ac Kc");
    assert_eq!(h.category, HandCategory::Straight);
    assert_eq!(h.description, "Straight, 9 high");

    let wheel = eval7("Ad 2c", "3h 4s 5d Kc 9h");
    assert_eq!(wheel.category, HandCategory::Straight);
    assert_eq!(wheel.description, "Straight, 5 high");
    assert_eq!(wheel.rank_values, vec![3, 2, 1, 0, -1]);
}

#[test]
fn trips_two_pair_pair_high_card() {
    assert_eq!(
        eval7("Qd Qh", "Qs 2c 7d 9c Jh").description,
        "Three of a Kind, Queens"
    );
    assert_eq!(
        eval7("Qd Qh", "2s 2c 7d 9c Jh").description,
        "Two Pair, Queens and Twos"
    );
    assert_eq!(eval7("Kd Kh", "2s 4c 7d 9c Jh").description, "Pair of Kings");

    let high = eval7("Ad Th", "2s 4c 7d 9c Jh");
    assert_eq!(high.category, HandCategory::HighCard);
    assert_eq!(high.description, "Ace high");
}

// ===== ORDERING =====

#[test]
fn wheel_loses_to_six_high_straight() {
    let wheel = eval7("Ad 2c", "3h 4s 5d Kc 9h");
    let six_high = eval7("6d 2c", "3h 4s 5d Kc 9h");
    assert!(six_high > wheel, "A-2-3-4-5 младше 2-3-4-5-6");
    assert_eq!(compare(&wheel, &six_high), -1);
    assert_eq!(compare(&six_high, &wheel), 1);
}

#[test]
fn royal_flush_beats_straight_flush() {
    let royal = eval7("As Ks", "Qs Js Ts 2d 3c");
    let steel = eval7("9s 8s", "7s 6s 5s 2d 3c");
    assert!(royal > steel);
}

#[test]
fn kicker_decides_pairs() {
    let a = eval7("Kd Ah", "Ks 2c 7d 9c Jh");
    let b = eval7("Kh Qh", "Ks 2c 7d 9c Jh");
    assert!(a > b, "Пара королей с тузом старше пары королей с дамой");
}

#[test]
fn board_plays_is_a_tie() {
    let board = "As Ks Qd Jc Th";
    let a = eval7("2c 3d", board);
    let b = eval7("4c 5d", board);
    assert_eq!(compare(&a, &b), 0);
    assert_eq!(a, b);
}

#[test]
fn ordering_is_total_and_transitive() {
    let hands = vec![
        eval7("Ad Th", "2s 4c 7d 9c Jh"),
        eval7("Kd Kh", "2s 4c 7d 9c Jh"),
        eval7("Qd Qh", "2s 2c 7d 9c Jh"),
        eval7("Qd Qh", "Qs 2c 7d 9c Jh"),
        eval7("Ad 2c", "3h 4s 5d Kc 9h"),
        eval7("9d 8c", "7h 6s 5d Ac Kc"),
        eval7("Ah 9h", "6h 4h 2h Kd Qc"),
        eval7("Kd Kh", "Ks 2c 2d 7c 9h"),
        eval7("Kd Kh", "Ks Kc 2d 3c 4h"),
        eval7("9h 8h", "7h 6h 5h Ad Ac"),
        eval7("As Ks", "Qs Js Ts 2d 3c"),
    ];

    // Список построен по возрастанию силы.
    for i in 0..hands.len() {
        for j in 0..hands.len() {
            let expected = (i as i64 - j as i64).signum() as i8;
            assert_eq!(
                compare(&hands[i], &hands[j]),
                expected,
                "compare({}, {})",
                hands[i].description,
                hands[j].description
            );
        }
    }
}

// ===== ERRORS =====

#[test]
fn wrong_card_count_is_an_error() {
    assert_eq!(
        evaluate(&cards("As Ks"), &cards("Qs Js")).unwrap_err(),
        EvalError::WrongCardCount(4)
    );
    assert_eq!(
        evaluate(&cards("As Ks"), &cards("Qs Js Ts 2d 3c 4h")).unwrap_err(),
        EvalError::WrongCardCount(8)
    );
}

#[test]
fn duplicate_card_is_an_error() {
    let err = evaluate(&cards("As Ks"), &cards("As Js Ts")).unwrap_err();
    assert!(matches!(err, EvalError::DuplicateCard(_)));
}

#[test]
fn five_and_six_cards_are_accepted() {
    assert!(evaluate(&cards("As Ks"), &cards("Qs Js Ts")).is_ok());
    assert!(evaluate(&cards("As Ks"), &cards("Qs Js Ts 9d")).is_ok());
}
