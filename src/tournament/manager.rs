// src/tournament/manager.rs
//! TournamentManager: оркестратор мультистолового турнира.
//!
//! Жизненный цикл:
//!   Created -> Registration -> Starting -> InProgress -> FinalTable -> HeadsUp -> Completed
//! (или Cancelled, если к старту игроков меньше `min_players`).
//!
//! Один раунд турнира:
//!   1) проверить таймер блайндов;
//!   2) на каждом столе с 2+ игроками сыграть одну раздачу, все столы параллельно;
//!   3) записать стеки обратно в места, отметить вылетевших;
//!   4) разобрать лишние столы и выровнять оставшиеся;
//!   5) пересчитать фазу.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::join_all;
use futures::FutureExt;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::domain::{
    BlindLevel, BlindStructure, Chips, Deck, EliminationRecord, HandId, PlayerRegistration,
    Standing, Table, TableState, TournamentConfig, TournamentError, TournamentPhase,
    TournamentState, Wallet,
};
use crate::engine::{DecisionSource, HandController, HandError, HandResult, PlayerConfig};
use crate::infra::Clock;
use crate::tournament::payouts::{PayoutCalculator, PointsAward};
use crate::tournament::rebalance::TableBalancer;
use crate::tournament::seating::{SeatAssignment, SeatingManager};

/// Сколько раундов подряд без единой сыгранной раздачи считаем зависанием.
const MAX_IDLE_ROUNDS: u32 = 3;

pub struct TournamentManager {
    config: TournamentConfig,
    clock: Arc<dyn Clock>,
    phase: TournamentPhase,
    registrations: Vec<PlayerRegistration>,
    tables: Vec<Table>,
    seat_assignments: Vec<SeatAssignment>,
    blinds: BlindStructure,
    seating: SeatingManager,
    balancer: TableBalancer,
    payouts: PayoutCalculator,
    eliminations: Vec<EliminationRecord>,
    awards: Vec<PointsAward>,
    /// Сквозной счётчик раздач турнира.
    hand_number: u64,
    hands_completed: u64,
    started_at_ms: Option<u64>,
    idle_rounds: u32,
}

impl TournamentManager {
    /// Проверяет конфиг и структуру выплат.
    pub fn new(config: TournamentConfig, clock: Arc<dyn Clock>) -> Result<Self, TournamentError> {
        config.validate().map_err(TournamentError::InvalidConfig)?;
        let payouts = PayoutCalculator::new(config.payout_structure.clone())?;
        let blinds = config.blind_structure.clone();

        Ok(Self {
            config,
            clock,
            phase: TournamentPhase::Created,
            registrations: Vec::new(),
            tables: Vec::new(),
            seat_assignments: Vec::new(),
            blinds,
            seating: SeatingManager::default(),
            balancer: TableBalancer::new(),
            payouts,
            eliminations: Vec::new(),
            awards: Vec::new(),
            hand_number: 0,
            hands_completed: 0,
            started_at_ms: None,
            idle_rounds: 0,
        })
    }

    // ===== Регистрация =====

    pub fn open_registration(&mut self) -> Result<(), TournamentError> {
        self.expect_phase(TournamentPhase::Created)?;
        self.phase = TournamentPhase::Registration;
        info!(tournament_id = %self.config.tournament_id, "registration opened");
        Ok(())
    }

    pub fn close_registration(&mut self) -> Result<(), TournamentError> {
        self.expect_phase(TournamentPhase::Registration)?;
        self.phase = TournamentPhase::Starting;
        info!(
            tournament_id = %self.config.tournament_id,
            registered = self.registrations.len(),
            "registration closed"
        );
        Ok(())
    }

    pub fn register_player(&mut self, wallet: &str, tier: &str) -> Result<(), TournamentError> {
        self.expect_phase(TournamentPhase::Registration)?;
        if self.is_registered(wallet) {
            return Err(TournamentError::AlreadyRegistered {
                wallet: wallet.to_string(),
            });
        }
        if self.registrations.len() >= self.config.max_players {
            return Err(TournamentError::TournamentFull {
                max_players: self.config.max_players,
            });
        }
        self.registrations.push(PlayerRegistration {
            wallet: wallet.to_string(),
            registered_at_ms: self.clock.now_ms(),
            tier: tier.to_string(),
        });
        Ok(())
    }

    pub fn unregister_player(&mut self, wallet: &str) -> Result<(), TournamentError> {
        self.expect_phase(TournamentPhase::Registration)?;
        let before = self.registrations.len();
        self.registrations.retain(|r| r.wallet != wallet);
        if self.registrations.len() == before {
            return Err(TournamentError::NotRegistered {
                wallet: wallet.to_string(),
            });
        }
        Ok(())
    }

    pub fn is_registered(&self, wallet: &str) -> bool {
        self.registrations.iter().any(|r| r.wallet == wallet)
    }

    // ===== Старт =====

    /// Закрыть регистрацию (если открыта), рассадить игроков, запустить таймер блайндов.
    ///
    /// Меньше `min_players` => турнир отменяется.
    pub fn start(&mut self) -> Result<(), TournamentError> {
        if self.phase == TournamentPhase::Registration {
            self.close_registration()?;
        }
        self.expect_phase(TournamentPhase::Starting)?;

        if self.registrations.len() < self.config.min_players {
            self.phase = TournamentPhase::Cancelled;
            warn!(
                tournament_id = %self.config.tournament_id,
                registered = self.registrations.len(),
                min_players = self.config.min_players,
                "tournament cancelled"
            );
            return Err(TournamentError::NotEnoughPlayers {
                registered: self.registrations.len(),
                min_players: self.config.min_players,
            });
        }

        let players: Vec<Wallet> = self.registrations.iter().map(|r| r.wallet.clone()).collect();
        let seed = SeatingManager::seating_seed(&self.config.blockhash, &self.config.tournament_id);
        let (tables, assignments) =
            self.seating
                .create_seating(&players, self.config.starting_stack, &seed)?;
        self.tables = tables;
        self.seat_assignments = assignments;

        let now = self.clock.now_ms();
        self.blinds.start_level(now);
        self.started_at_ms = Some(now);
        self.update_phase();

        info!(
            tournament_id = %self.config.tournament_id,
            players = players.len(),
            tables = self.tables.len(),
            seating_seed = %seed,
            phase = ?self.phase,
            "tournament started"
        );
        Ok(())
    }

    // ===== Игра =====

    /// Играть раунды до конца турнира. Возвращает итоговые награды.
    pub async fn run(
        &mut self,
        decisions: &dyn DecisionSource,
    ) -> Result<Vec<PointsAward>, TournamentError> {
        if matches!(
            self.phase,
            TournamentPhase::Registration | TournamentPhase::Starting
        ) {
            self.start()?;
        }

        while self.phase.is_running() {
            self.play_round(decisions).await?;
        }

        if self.phase != TournamentPhase::Completed {
            return Err(TournamentError::InvalidPhase {
                expected: TournamentPhase::Completed,
                found: self.phase,
            });
        }
        Ok(self.awards.clone())
    }

    /// Один раунд: по раздаче на каждом столе с 2+ игроками, параллельно.
    pub async fn play_round(
        &mut self,
        decisions: &dyn DecisionSource,
    ) -> Result<Vec<HandResult>, TournamentError> {
        if !self.phase.is_running() {
            return Err(TournamentError::InvalidPhase {
                expected: TournamentPhase::InProgress,
                found: self.phase,
            });
        }

        let now = self.clock.now_ms();
        if self.blinds.check_level_up(now) {
            let level = self.blinds.current_level();
            info!(
                level = level.level,
                small_blind = %level.small_blind,
                big_blind = %level.big_blind,
                ante = %level.ante,
                "blind level up"
            );
        }

        if !self.tables.iter().any(|t| t.player_count() >= 2) {
            self.phase = TournamentPhase::Completed;
            self.finish();
            return Ok(Vec::new());
        }

        let current_level = self.blinds.current_level();
        let level = &current_level;
        let blockhash = self.config.blockhash.clone();
        let tournament_id = self.config.tournament_id.clone();
        let mut next_hand = self.hand_number;

        let hands: Vec<_> = self
            .tables
            .iter_mut()
            .filter(|t| t.player_count() >= 2)
            .map(|table| {
                next_hand += 1;
                let hand_id: HandId = format!("{tournament_id}_hand_{next_hand}");
                let deck = Deck::for_hand(&blockhash, &tournament_id, next_hand);
                let table_id = table.id.clone();
                let span = info_span!("hand", hand_id = %hand_id, table_id = %table_id);
                async move {
                    let outcome = play_hand_on_table(table, hand_id, deck, level, decisions).await;
                    (table_id, outcome)
                }
                .instrument(span)
            })
            .collect();

        let outcomes = join_all(hands).await;
        self.hand_number = next_hand;

        let mut results = Vec::with_capacity(outcomes.len());
        for (table_id, outcome) in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(err) => warn!(
                    table_id = %table_id,
                    error = %err,
                    "hand failed, table skipped this round"
                ),
            }
        }
        self.hands_completed += results.len() as u64;

        if results.is_empty() {
            self.idle_rounds += 1;
            if self.idle_rounds >= MAX_IDLE_ROUNDS {
                return Err(TournamentError::Stalled {
                    rounds: self.idle_rounds,
                });
            }
        } else {
            self.idle_rounds = 0;
        }

        self.process_eliminations(&results);

        let plan = self.balancer.rebalance_until_stable(&mut self.tables);
        if !plan.is_empty() {
            debug!(
                moves = plan.moves.len(),
                broken = plan.broken_tables.len(),
                tables = self.tables.len(),
                "tables rebalanced"
            );
        }

        self.update_phase();
        if self.phase == TournamentPhase::Completed {
            self.finish();
        }
        Ok(results)
    }

    /// Вылетевшие в одном раунде получают разные места подряд:
    /// больший стек на начало раздачи => место выше.
    fn process_eliminations(&mut self, results: &[HandResult]) {
        let mut busted: Vec<(Wallet, Chips)> = results
            .iter()
            .flat_map(|r| {
                r.eliminations.iter().map(move |w| {
                    let start = r.starting_stacks.get(w).copied().unwrap_or(Chips::ZERO);
                    (w.clone(), start)
                })
            })
            .filter(|(w, _)| !self.eliminations.iter().any(|e| &e.wallet == w))
            .collect();
        if busted.is_empty() {
            return;
        }
        busted.sort_by(|a, b| b.1.cmp(&a.1));

        let remaining = self.active_player_count() as u32;
        for (offset, (wallet, _)) in busted.into_iter().enumerate() {
            let final_rank = remaining + 1 + offset as u32;
            let points_won = self.payouts.points_for(final_rank);
            info!(
                wallet = %wallet,
                final_rank,
                hand_number = self.hand_number,
                points_won,
                "player eliminated"
            );
            self.eliminations.push(EliminationRecord {
                wallet,
                final_rank,
                hand_number: self.hand_number,
                points_won,
            });
        }
    }

    fn update_phase(&mut self) {
        let active_players = self.active_player_count();
        let active_tables = self.tables.iter().filter(|t| t.player_count() > 0).count();

        self.phase = match active_players {
            0 | 1 => TournamentPhase::Completed,
            2 => TournamentPhase::HeadsUp,
            _ if active_tables == 1 => TournamentPhase::FinalTable,
            _ => TournamentPhase::InProgress,
        };
    }

    /// Итоговые места и награды.
    fn finish(&mut self) {
        if !self.awards.is_empty() {
            return;
        }
        let rankings = self.final_rankings();
        self.awards = self.payouts.calculate(&rankings);
        info!(
            tournament_id = %self.config.tournament_id,
            hands = self.hands_completed,
            awards = self.awards.len(),
            winner = ?rankings.iter().find(|(_, rank)| *rank == 1).map(|(w, _)| w),
            "tournament completed"
        );
    }

    /// (кошелёк, место): оставшиеся по стеку, вылетевшие по записи о вылете.
    pub fn final_rankings(&self) -> Vec<(Wallet, u32)> {
        let mut rankings: Vec<(Wallet, u32)> = self
            .survivors_by_stack()
            .into_iter()
            .enumerate()
            .map(|(i, (wallet, _))| (wallet, i as u32 + 1))
            .collect();
        rankings.extend(
            self.eliminations
                .iter()
                .rev()
                .map(|e| (e.wallet.clone(), e.final_rank)),
        );
        rankings
    }

    fn survivors_by_stack(&self) -> Vec<(Wallet, Chips)> {
        let mut survivors: Vec<(Wallet, Chips)> = self
            .tables
            .iter()
            .flat_map(|t| t.active_players())
            .filter_map(|s| s.wallet.clone().map(|w| (w, s.stack)))
            .collect();
        survivors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        survivors
    }

    fn active_player_count(&self) -> usize {
        self.tables.iter().map(Table::player_count).sum()
    }

    fn expect_phase(&self, expected: TournamentPhase) -> Result<(), TournamentError> {
        if self.phase != expected {
            return Err(TournamentError::InvalidPhase {
                expected,
                found: self.phase,
            });
        }
        Ok(())
    }

    // ===== Наблюдение =====

    pub fn state(&self) -> TournamentState {
        let elapsed = self
            .started_at_ms
            .map(|started| self.clock.now_ms().saturating_sub(started) / 1_000)
            .unwrap_or(0);
        TournamentState {
            tournament_id: self.config.tournament_id.clone(),
            phase: self.phase,
            registered_players: self.registrations.len(),
            active_players: self.active_player_count(),
            eliminated_players: self.eliminations.len(),
            tables_active: self.tables.iter().filter(|t| t.player_count() > 0).count(),
            current_blind_level: self.blinds.current_level(),
            hands_played: self.hand_number,
            time_elapsed_seconds: elapsed,
            prize_pool: self.payouts.total_points(),
        }
    }

    /// Стек играющего игрока (None для вылетевших и незнакомых).
    pub fn player_stack(&self, wallet: &str) -> Option<Chips> {
        self.tables
            .iter()
            .filter_map(|t| t.player_seat(wallet))
            .find(|s| s.is_playing())
            .map(|s| s.stack)
    }

    /// Стол, за которым числится игрок.
    pub fn player_table(&self, wallet: &str) -> Option<&str> {
        self.tables
            .iter()
            .find(|t| t.player_seat(wallet).is_some())
            .map(|t| t.id.as_str())
    }

    /// Играющие по стеку, затем вылетевшие с их местами и очками.
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .survivors_by_stack()
            .into_iter()
            .enumerate()
            .map(|(i, (wallet, stack))| Standing {
                wallet,
                rank: i as u32 + 1,
                value: stack.0 as i64,
                eliminated: false,
            })
            .collect();
        standings.extend(self.eliminations.iter().map(|e| Standing {
            wallet: e.wallet.clone(),
            rank: e.final_rank,
            value: e.points_won,
            eliminated: true,
        }));
        standings
    }

    pub fn phase(&self) -> TournamentPhase {
        self.phase
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn registrations(&self) -> &[PlayerRegistration] {
        &self.registrations
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn seat_assignments(&self) -> &[SeatAssignment] {
        &self.seat_assignments
    }

    pub fn blind_structure(&self) -> &BlindStructure {
        &self.blinds
    }

    pub fn eliminations(&self) -> &[EliminationRecord] {
        &self.eliminations
    }

    pub fn awards(&self) -> &[PointsAward] {
        &self.awards
    }

    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }

    /// Сколько раздач завершилось успешно.
    pub fn hands_completed(&self) -> u64 {
        self.hands_completed
    }

    /// Все фишки в игре.
    pub fn total_chips(&self) -> Chips {
        self.tables.iter().map(Table::total_chips).sum()
    }
}

/// Сыграть одну раздачу за столом и записать итог в места.
///
/// При ошибке (в том числе панике агента) стол остаётся в состоянии до
/// раздачи: стеки не трогаем, кнопку возвращаем на место.
async fn play_hand_on_table(
    table: &mut Table,
    hand_id: HandId,
    deck: Deck,
    level: &BlindLevel,
    decisions: &dyn DecisionSource,
) -> Result<HandResult, HandError> {
    let button_before = table.button_position;
    table.advance_button();
    let players: Vec<PlayerConfig> = table
        .active_players()
        .into_iter()
        .filter_map(|s| {
            s.wallet.as_ref().map(|w| PlayerConfig {
                wallet: w.clone(),
                stack: s.stack,
                seat: s.position,
            })
        })
        .collect();

    let controller = match HandController::new(hand_id, players, table.button_position, level, deck) {
        Ok(controller) => controller,
        Err(err) => {
            table.button_position = button_before;
            return Err(err);
        }
    };

    table.state = TableState::Betting;
    let outcome = AssertUnwindSafe(controller.run(decisions))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(HandError::Internal(panic_message(panic.as_ref()))));
    table.state = TableState::Waiting;

    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            table.button_position = button_before;
            return Err(err);
        }
    };

    for (wallet, stack) in &result.final_stacks {
        table.set_stack(wallet, *stack);
        if stack.is_zero() {
            table.eliminate_player(wallet);
        }
    }
    Ok(result)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload");
    format!("decision source panicked: {detail}")
}
