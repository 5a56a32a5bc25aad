// tests/tournament_tests.rs
//
// Турнир целиком через TournamentManager:
//  - регистрация и переходы фаз;
//  - отмена при нехватке игроков;
//  - конфиг из JSON (blockhash в hex, ровно 32 байта);
//  - падение агента за одним столом не срывает раунд на остальных;
//  - полный турнир на 27 агентов: 3 стола, параллельные раздачи, разбор
//    столов, сохранение фишек, итоговые места и очки.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use poker_arena::domain::{
    BlindLevel, BlindStructure, Chips, Rank, TournamentConfig, TournamentError, TournamentPhase,
};
use poker_arena::engine::{Action, ActionType, FnDecisionSource, HandState};
use poker_arena::infra::{ManualClock, RngSeed};
use poker_arena::tournament::{is_balanced, PayoutError, TournamentManager};

// ===== HELPERS =====

fn blinds() -> BlindStructure {
    BlindStructure::new(vec![
        BlindLevel::new(1, 25, 50, 0, 1),
        BlindLevel::new(2, 50, 100, 10, 1),
        BlindLevel::new(3, 100, 200, 25, 1),
        BlindLevel::new(4, 200, 400, 50, 1),
        BlindLevel::new(5, 400, 800, 100, 1),
        BlindLevel::new(6, 800, 1600, 200, 1),
    ])
}

fn payouts() -> BTreeMap<u32, i64> {
    [(1, 8000), (2, 5000), (3, 3000), (4, 2000), (5, 1500), (6, 500)]
        .into_iter()
        .collect()
}

fn config(id: &str, max_players: usize) -> TournamentConfig {
    TournamentConfig {
        tournament_id: id.to_string(),
        name: "Agent arena".to_string(),
        starting_stack: Chips(1_500),
        blind_structure: blinds(),
        payout_structure: payouts(),
        max_players,
        min_players: 2,
        blockhash: RngSeed::hash_of(b"e2e_27_hash").bytes.to_vec(),
    }
}

fn manager_with(config: TournamentConfig) -> (TournamentManager, ManualClock) {
    let clock = ManualClock::new(1_000);
    let manager = TournamentManager::new(config, Arc::new(clock.clone())).unwrap();
    (manager, clock)
}

fn registered(id: &str, players: usize) -> (TournamentManager, ManualClock) {
    let (mut manager, clock) = manager_with(config(id, 54));
    manager.open_registration().unwrap();
    let tiers = ["free", "basic", "pro"];
    for i in 0..players {
        manager
            .register_player(&format!("agent_{:02}", i + 1), tiers[i % tiers.len()])
            .unwrap();
    }
    (manager, clock)
}

/// Бот без состояния: олл-ин с парой или картой от дамы, иначе
/// check / дешёвый call / fold.
fn card_bot(_wallet: &str, state: &HandState) -> Action {
    let Some(me) = state.acting_player() else {
        return Action::Fold;
    };
    let strong = match state.hole_cards.as_slice() {
        [a, b] => a.rank == b.rank || a.rank.max(b.rank) >= Rank::Queen,
        _ => false,
    };

    if strong && state.can(ActionType::Raise) {
        return Action::RaiseTo(me.current_bet + me.stack);
    }
    if state.can(ActionType::Check) {
        return Action::Check;
    }
    if strong || state.to_call().0 * 4 <= me.stack.0 {
        Action::Call
    } else {
        Action::Fold
    }
}

/// Играть раунды, сдвигая часы, пока турнир идёт.
async fn play_out(
    manager: &mut TournamentManager,
    clock: &ManualClock,
    seconds_per_round: u64,
    max_rounds: usize,
) -> usize {
    let bot = FnDecisionSource(card_bot);
    let chips = manager.total_chips();
    let mut rounds = 0;
    while manager.phase().is_running() {
        assert!(rounds < max_rounds, "турнир не закончился за {max_rounds} раундов");
        clock.advance_secs(seconds_per_round);
        manager.play_round(&bot).await.unwrap();
        rounds += 1;

        assert_eq!(manager.total_chips(), chips, "фишки не должны появляться и исчезать");
        if manager.phase().is_running() {
            let counts: Vec<usize> = manager.tables().iter().map(|t| t.player_count()).collect();
            assert!(is_balanced(&counts, 1), "столы разбалансированы: {counts:?}");
        }
    }
    rounds
}

// ===== REGISTRATION =====

#[test]
fn registration_requires_open_phase() {
    let (mut manager, _) = manager_with(config("t1", 54));
    let err = manager.register_player("alice", "free").unwrap_err();
    assert!(matches!(
        err,
        TournamentError::InvalidPhase {
            expected: TournamentPhase::Registration,
            found: TournamentPhase::Created
        }
    ));
}

#[test]
fn duplicate_and_full_registrations_are_rejected() {
    let (mut manager, _) = manager_with(config("t1", 3));
    manager.open_registration().unwrap();
    manager.register_player("alice", "free").unwrap();
    manager.register_player("bob", "pro").unwrap();

    assert!(matches!(
        manager.register_player("alice", "basic"),
        Err(TournamentError::AlreadyRegistered { .. })
    ));

    manager.register_player("carol", "basic").unwrap();
    assert!(matches!(
        manager.register_player("dave", "free"),
        Err(TournamentError::TournamentFull { max_players: 3 })
    ));

    manager.unregister_player("carol").unwrap();
    assert!(!manager.is_registered("carol"));
    assert!(matches!(
        manager.unregister_player("carol"),
        Err(TournamentError::NotRegistered { .. })
    ));
    manager.register_player("dave", "free").unwrap();

    assert_eq!(manager.registrations().len(), 3);
    assert_eq!(manager.registrations()[1].tier, "pro");
    assert_eq!(manager.registrations()[0].registered_at_ms, 1_000);
}

#[test]
fn too_few_players_cancels_the_tournament() {
    let (mut manager, _) = registered("t1", 1);
    let err = manager.start().unwrap_err();
    assert!(matches!(
        err,
        TournamentError::NotEnoughPlayers {
            registered: 1,
            min_players: 2
        }
    ));
    assert_eq!(manager.phase(), TournamentPhase::Cancelled);
    assert!(manager.tables().is_empty());
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = config("t1", 54);
    cfg.min_players = 1;
    assert!(matches!(
        TournamentManager::new(cfg, Arc::new(ManualClock::new(0))),
        Err(TournamentError::InvalidConfig(_))
    ));

    for len in [0, 31, 33] {
        let mut cfg = config("t1", 54);
        cfg.blockhash = vec![7; len];
        assert!(
            matches!(
                TournamentManager::new(cfg, Arc::new(ManualClock::new(0))),
                Err(TournamentError::InvalidConfig(_))
            ),
            "blockhash длины {len} должен отклоняться"
        );
    }

    let mut cfg = config("t1", 54);
    cfg.payout_structure.clear();
    assert!(matches!(
        TournamentManager::new(cfg, Arc::new(ManualClock::new(0))),
        Err(TournamentError::Payout(PayoutError::Empty))
    ));
}

#[tokio::test]
async fn play_round_before_start_fails() {
    let (mut manager, _) = registered("t1", 4);
    let err = manager.play_round(&FnDecisionSource(card_bot)).await.unwrap_err();
    assert!(matches!(err, TournamentError::InvalidPhase { .. }));
}

// ===== START =====

#[test]
fn start_seats_everyone_and_starts_the_clock() {
    let (mut manager, clock) = registered("t1", 20);
    manager.start().unwrap();

    assert_eq!(manager.phase(), TournamentPhase::InProgress);
    let mut counts: Vec<usize> = manager.tables().iter().map(|t| t.player_count()).collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![6, 7, 7]);

    assert_eq!(manager.seat_assignments().len(), 20);
    assert_eq!(manager.total_chips(), Chips(30_000));
    for reg in manager.registrations() {
        assert_eq!(manager.player_stack(&reg.wallet), Some(Chips(1_500)));
        assert!(manager.player_table(&reg.wallet).is_some());
    }

    clock.advance_secs(90);
    let state = manager.state();
    assert_eq!(state.registered_players, 20);
    assert_eq!(state.active_players, 20);
    assert_eq!(state.tables_active, 3);
    assert_eq!(state.time_elapsed_seconds, 90);
    assert_eq!(state.prize_pool, 20_000);
    assert_eq!(state.current_blind_level.level, 1);
}

#[test]
fn small_field_starts_at_the_final_table() {
    let (mut manager, _) = registered("t1", 6);
    manager.start().unwrap();
    assert_eq!(manager.phase(), TournamentPhase::FinalTable);

    let (mut manager, _) = registered("t2", 2);
    manager.start().unwrap();
    assert_eq!(manager.phase(), TournamentPhase::HeadsUp);
}

#[tokio::test]
async fn blind_level_advances_between_rounds() {
    let (mut manager, clock) = registered("t1", 9);
    manager.start().unwrap();

    clock.advance_secs(61);
    manager.play_round(&FnDecisionSource(card_bot)).await.unwrap();
    assert_eq!(manager.blind_structure().current_level().level, 2);
    assert_eq!(manager.hand_number(), 1);
}

#[test]
fn config_from_json() {
    let raw = r#"{
        "tournament_id": "json_cup",
        "name": "Json cup",
        "starting_stack": 2000,
        "blind_structure": {
            "levels": [
                { "level": 1, "small_blind": 25, "big_blind": 50, "ante": 0, "duration_minutes": 5 }
            ]
        },
        "payout_structure": { "1": 700, "2": 300 },
        "blockhash": "00ff100000000000000000000000000000000000000000000000000000000001"
    }"#;

    let cfg: TournamentConfig = serde_json::from_str(raw).unwrap();
    assert_eq!(cfg.blockhash.len(), 32);
    assert_eq!(&cfg.blockhash[..3], &[0x00, 0xff, 0x10]);
    assert_eq!(cfg.blockhash[31], 0x01);
    assert_eq!(cfg.max_players, 54);
    assert_eq!(cfg.min_players, 2);
    assert_eq!(cfg.payout_structure.get(&2), Some(&300));
    assert_eq!(cfg.blind_structure.current_level().big_blind, Chips(50));
    assert!(cfg.validate().is_ok());
}

// ===== FULL TOURNAMENT =====

#[tokio::test]
async fn twenty_seven_agents_play_to_a_winner() {
    let (mut manager, clock) = registered("e2e_27", 27);
    manager.start().unwrap();

    assert_eq!(manager.tables().len(), 3);
    assert!(manager.tables().iter().all(|t| t.player_count() == 9));
    assert_eq!(manager.total_chips(), Chips(27 * 1_500));

    play_out(&mut manager, &clock, 20, 5_000).await;

    assert_eq!(manager.phase(), TournamentPhase::Completed);
    assert_eq!(manager.tables().len(), 1);
    assert_eq!(manager.eliminations().len() + 1, 27);
    assert!(manager.hand_number() >= manager.hands_completed());

    // Все места 1..=27 разные.
    let rankings = manager.final_rankings();
    assert_eq!(rankings.len(), 27);
    let ranks: HashSet<u32> = rankings.iter().map(|(_, r)| *r).collect();
    assert_eq!(ranks, (1..=27).collect::<HashSet<u32>>());

    // Победитель держит все фишки.
    let standings = manager.standings();
    let winner = &standings[0];
    assert!(!winner.eliminated);
    assert_eq!(winner.rank, 1);
    assert_eq!(winner.value, 27 * 1_500);

    // Очки: ровно шесть призовых мест.
    let awards = manager.awards();
    assert_eq!(awards.len(), 6);
    let expected = payouts();
    for (i, award) in awards.iter().enumerate() {
        assert_eq!(award.rank, i as u32 + 1);
        assert_eq!(Some(&award.points), expected.get(&award.rank));
    }
    assert_eq!(awards[0].wallet, winner.wallet);

    for e in manager.eliminations() {
        assert_eq!(e.points_won, expected.get(&e.final_rank).copied().unwrap_or(0));
    }

    let state = manager.state();
    assert_eq!(state.active_players, 1);
    assert_eq!(state.eliminated_players, 26);
    assert_eq!(state.hands_played, manager.hand_number());
}

#[tokio::test]
async fn same_seed_replays_the_same_tournament() {
    let mut outcomes = Vec::new();
    for _ in 0..2 {
        let (mut manager, clock) = registered("replay", 12);
        manager.start().unwrap();
        play_out(&mut manager, &clock, 20, 5_000).await;
        outcomes.push((manager.eliminations().to_vec(), manager.awards().to_vec()));
    }
    assert_eq!(outcomes[0], outcomes[1]);
}

#[tokio::test]
async fn run_plays_heads_up_to_completion() {
    let (mut manager, _) = registered("heads_up", 2);

    let awards = manager.run(&FnDecisionSource(card_bot)).await.unwrap();

    assert_eq!(manager.phase(), TournamentPhase::Completed);
    assert_eq!(awards.len(), 2);
    assert_eq!((awards[0].rank, awards[0].points), (1, 8000));
    assert_eq!((awards[1].rank, awards[1].points), (2, 5000));
    assert_eq!(manager.eliminations().len(), 1);
    assert_eq!(manager.eliminations()[0].wallet, awards[1].wallet);
}

// ===== FAILURE ISOLATION =====

#[tokio::test]
async fn crashing_agent_does_not_abort_other_tables() {
    let (mut manager, _) = registered("isolation", 18);
    manager.start().unwrap();
    assert_eq!(manager.tables().len(), 2);

    let broken_table = manager.tables()[0].clone();
    assert_eq!(broken_table.id, "table_1");
    let broken: HashSet<String> = broken_table
        .active_players()
        .iter()
        .filter_map(|s| s.wallet.clone())
        .collect();
    let stacks_before: Vec<(String, Chips)> = broken
        .iter()
        .map(|w| (w.clone(), manager.player_stack(w).unwrap()))
        .collect();

    let bot = FnDecisionSource(move |wallet: &str, state: &HandState| {
        if broken.contains(wallet) {
            panic!("agent {wallet} crashed");
        }
        card_bot(wallet, state)
    });

    let results = manager.play_round(&bot).await.unwrap();

    assert_eq!(results.len(), 1, "раздача за вторым столом должна доиграться");
    assert_eq!(results[0].hand_id, "isolation_hand_2");
    assert_eq!(manager.hand_number(), 2);
    assert_eq!(manager.hands_completed(), 1);
    assert!(manager.hands_completed() < manager.hand_number());
    assert_eq!(manager.total_chips(), Chips(18 * 1_500));

    // Упавший стол остался как до раздачи.
    for (wallet, stack) in &stacks_before {
        assert_eq!(manager.player_stack(wallet), Some(*stack), "{wallet}");
    }
    let table_1 = manager.tables().iter().find(|t| t.id == "table_1").unwrap();
    assert_eq!(table_1.button_position, broken_table.button_position);
    assert_eq!(table_1.state, broken_table.state);
}

#[tokio::test]
async fn tournament_stalls_when_every_hand_fails() {
    let (mut manager, _) = registered("stalled", 18);
    manager.start().unwrap();

    let bot = FnDecisionSource(|wallet: &str, _state: &HandState| -> Action {
        panic!("agent {wallet} crashed")
    });

    for _ in 0..2 {
        let results = manager.play_round(&bot).await.unwrap();
        assert!(results.is_empty());
    }
    let err = manager.play_round(&bot).await.unwrap_err();
    assert!(matches!(err, TournamentError::Stalled { rounds: 3 }));

    assert_eq!(manager.hands_completed(), 0);
    assert_eq!(manager.hand_number(), 6);
    assert_eq!(manager.total_chips(), Chips(18 * 1_500));
    assert!(manager.eliminations().is_empty());
}
