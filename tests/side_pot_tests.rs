// tests/side_pot_tests.rs
//
// Сайд-поты: уровни олл-инов, вклады сфолдивших, распределение и лишняя фишка.

use std::collections::HashMap;

use poker_arena::domain::Chips;
use poker_arena::engine::side_pots::{calculate, distribute};
use poker_arena::engine::{Contribution, SidePot};

/// Утилита: (amount, eligible) из пота.
fn pot_info(p: &SidePot) -> (u64, Vec<&str>) {
    (
        p.amount.0,
        p.eligible_players.iter().map(String::as_str).collect(),
    )
}

fn total(pots: &[SidePot]) -> u64 {
    pots.iter().map(|p| p.amount.0).sum()
}

fn ranks(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
    pairs.iter().map(|(w, r)| (w.to_string(), *r)).collect()
}

// ===== CALCULATE =====

/// A олл-ин 1000, B олл-ин 2000, C коллирует 5000.
#[test]
fn three_tier_example() {
    let pots = calculate(&[
        Contribution::new("A", 1000, true, true),
        Contribution::new("B", 2000, true, true),
        Contribution::new("C", 5000, true, false),
    ]);

    assert_eq!(pots.len(), 3);
    assert_eq!(pot_info(&pots[0]), (3000, vec!["A", "B", "C"]));
    assert_eq!(pot_info(&pots[1]), (2000, vec!["B", "C"]));
    assert_eq!(pot_info(&pots[2]), (3000, vec!["C"]));
    assert_eq!(total(&pots), 8000);
}

#[test]
fn no_all_in_gives_single_pot() {
    let pots = calculate(&[
        Contribution::new("A", 400, true, false),
        Contribution::new("B", 400, true, false),
        Contribution::new("C", 100, false, false),
    ]);
    assert_eq!(pots.len(), 1);
    assert_eq!(pot_info(&pots[0]), (900, vec!["A", "B"]));
}

/// Сфолдивший игрок частично покрыл уровень олл-ина:
/// его фишки в поте, но права на пот у него нет.
#[test]
fn folded_contribution_counts_but_is_not_eligible() {
    let pots = calculate(&[
        Contribution::new("A", 1000, true, true),
        Contribution::new("B", 500, false, false),
        Contribution::new("C", 3000, true, false),
        Contribution::new("D", 3000, true, false),
    ]);

    assert_eq!(pots.len(), 2);
    assert_eq!(pot_info(&pots[0]), (3500, vec!["A", "C", "D"]));
    assert_eq!(pot_info(&pots[1]), (4000, vec!["C", "D"]));
    assert_eq!(total(&pots), 7500);
}

/// Фишки выше последнего уровня без претендентов не теряются.
#[test]
fn orphan_tier_merges_into_previous_pot() {
    let pots = calculate(&[
        Contribution::new("A", 100, true, true),
        Contribution::new("B", 300, false, false),
    ]);
    assert_eq!(pots.len(), 1);
    assert_eq!(pot_info(&pots[0]), (400, vec!["A"]));
}

#[test]
fn equal_all_ins_share_one_level() {
    let pots = calculate(&[
        Contribution::new("A", 500, true, true),
        Contribution::new("B", 500, true, true),
        Contribution::new("C", 800, true, false),
    ]);
    assert_eq!(pots.len(), 2);
    assert_eq!(pot_info(&pots[0]), (1500, vec!["A", "B", "C"]));
    assert_eq!(pot_info(&pots[1]), (300, vec!["C"]));
}

#[test]
fn zero_contributions_give_no_pots() {
    assert!(calculate(&[]).is_empty());
    assert!(calculate(&[Contribution::new("A", 0, true, false)]).is_empty());
}

// ===== DISTRIBUTE =====

#[test]
fn short_stack_wins_main_pot_only() {
    let pots = calculate(&[
        Contribution::new("A", 1000, true, true),
        Contribution::new("B", 2000, true, true),
        Contribution::new("C", 5000, true, false),
    ]);
    // A лучшая рука, затем C, затем B.
    let won = distribute(&pots, &ranks(&[("A", 0), ("C", 1), ("B", 2)]));

    assert_eq!(won.get("A"), Some(&Chips(3000)));
    assert_eq!(won.get("C"), Some(&Chips(5000)));
    assert_eq!(won.get("B"), None);
}

#[test]
fn tie_splits_pot_and_odd_chip_goes_first() {
    let pots = vec![SidePot {
        amount: Chips(101),
        eligible_players: vec!["A".to_string(), "B".to_string(), "C".to_string()],
    }];
    let won = distribute(&pots, &ranks(&[("A", 1), ("B", 0), ("C", 0)]));

    assert_eq!(won.get("B"), Some(&Chips(51)));
    assert_eq!(won.get("C"), Some(&Chips(50)));
    assert_eq!(won.get("A"), None);
}

#[test]
fn distributed_total_equals_pots() {
    let pots = calculate(&[
        Contribution::new("A", 333, true, true),
        Contribution::new("B", 777, true, true),
        Contribution::new("C", 1000, true, false),
        Contribution::new("D", 1000, true, false),
    ]);
    let won = distribute(&pots, &ranks(&[("A", 0), ("B", 0), ("C", 1), ("D", 1)]));
    let paid: u64 = won.values().map(|c| c.0).sum();
    assert_eq!(paid, total(&pots));
    assert_eq!(paid, 3110);
}
