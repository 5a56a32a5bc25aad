// src/engine/hand_controller.rs
//! Оркестратор одной раздачи: блайнды и анте, раздача карт, четыре улицы
//! ставок, шоудаун и распределение сайд-потов.
//!
//! Решения запрашиваются у внешнего `DecisionSource`; каждое решение
//! перепроверяется `BettingRound`, недопустимое заменяется на check/fold.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{
    BlindLevel, Card, Chips, Deck, HandId, HandPhase, PlayerInHand, SeatIndex, Wallet,
};
use crate::engine::actions::Action;
use crate::engine::betting::BettingRound;
use crate::engine::decision::{safe_fallback, DecisionSource, HandState, PlayerView};
use crate::engine::errors::HandError;
use crate::engine::hand_history::{HandAction, HandActionKind, HandHistory};
use crate::engine::positions::{
    blind_indices, button_index, postflop_first_to_act, preflop_first_to_act,
};
use crate::engine::side_pots::{self, Contribution, SidePot};
use crate::eval::{self, EvaluatedHand};

/// Игрок, входящий в раздачу.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerConfig {
    pub wallet: Wallet,
    pub stack: Chips,
    pub seat: SeatIndex,
}

impl PlayerConfig {
    pub fn new(wallet: impl Into<Wallet>, stack: u64, seat: SeatIndex) -> Self {
        Self {
            wallet: wallet.into(),
            stack: Chips(stack),
            seat,
        }
    }
}

/// Итог раздачи: единица аудита и реплея.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HandResult {
    pub hand_id: HandId,
    /// Кошелёк -> сколько выиграл из банка.
    pub winners: BTreeMap<Wallet, Chips>,
    pub pot_total: Chips,
    /// Оценённые руки (только при шоудауне).
    pub final_hands: BTreeMap<Wallet, EvaluatedHand>,
    pub side_pots: Vec<SidePot>,
    /// Игроки с нулевым стеком после раздачи (в порядке мест).
    pub eliminations: Vec<Wallet>,
    pub actions: Vec<HandAction>,
    pub community_cards: Vec<Card>,
    /// Карманные карты всех участников, включая сфолдивших.
    pub hole_cards: BTreeMap<Wallet, Vec<Card>>,
    pub starting_stacks: BTreeMap<Wallet, Chips>,
    pub final_stacks: BTreeMap<Wallet, Chips>,
}

/// Одна раздача. Владеет колодой и игроками; после `run` уничтожается.
#[derive(Debug)]
pub struct HandController {
    hand_id: HandId,
    players: Vec<PlayerInHand>,
    button: usize,
    small_blind: Chips,
    big_blind: Chips,
    ante: Chips,
    deck: Deck,
    community: Vec<Card>,
    phase: HandPhase,
    pot: Chips,
    current_bet: Chips,
    history: HandHistory,
}

impl HandController {
    /// Игроки упорядочиваются по местам; игроки с нулевым стеком в раздачу не входят.
    pub fn new(
        hand_id: impl Into<HandId>,
        players: Vec<PlayerConfig>,
        button_seat: SeatIndex,
        level: &BlindLevel,
        deck: Deck,
    ) -> Result<Self, HandError> {
        let mut players: Vec<PlayerConfig> =
            players.into_iter().filter(|p| !p.stack.is_zero()).collect();
        players.sort_by_key(|p| p.seat);
        players.dedup_by(|a, b| a.wallet == b.wallet);

        if players.len() < 2 {
            return Err(HandError::NotEnoughPlayers(players.len()));
        }

        let seats: Vec<SeatIndex> = players.iter().map(|p| p.seat).collect();
        let button = button_index(&seats, button_seat);

        Ok(Self {
            hand_id: hand_id.into(),
            players: players
                .into_iter()
                .map(|p| PlayerInHand::new(p.wallet, p.seat, p.stack))
                .collect(),
            button,
            small_blind: level.small_blind,
            big_blind: level.big_blind,
            ante: level.ante,
            deck,
            community: Vec::new(),
            phase: HandPhase::Waiting,
            pot: Chips::ZERO,
            current_bet: Chips::ZERO,
            history: HandHistory::new(),
        })
    }

    pub fn hand_id(&self) -> &str {
        &self.hand_id
    }

    pub fn phase(&self) -> HandPhase {
        self.phase
    }

    pub fn players(&self) -> &[PlayerInHand] {
        &self.players
    }

    /// Сыграть раздачу целиком.
    pub async fn run(mut self, decisions: &dyn DecisionSource) -> Result<HandResult, HandError> {
        let starting_stacks: BTreeMap<Wallet, Chips> = self
            .players
            .iter()
            .map(|p| (p.wallet.clone(), p.stack))
            .collect();
        debug!(hand_id = %self.hand_id, players = self.players.len(), "hand started");

        self.post_blinds();
        self.deal_hole_cards()?;

        self.phase = HandPhase::Preflop;
        if self.betting_needed() {
            let first = preflop_first_to_act(self.players.len(), self.button);
            self.run_betting_round(first, decisions).await?;
        }

        while let Some((next, count)) = self.phase.next_street() {
            if self.active_count() <= 1 {
                break;
            }
            self.reset_bets_for_street();
            self.deal_community(count)?;
            self.phase = next;
            if self.betting_needed() {
                let first = postflop_first_to_act(self.players.len(), self.button);
                self.run_betting_round(first, decisions).await?;
            }
        }

        self.finish(starting_stacks)
    }

    /// Текущее наблюдаемое состояние (вне раунда ставок: без действующего игрока).
    pub fn state(&self) -> HandState {
        HandState {
            hand_id: self.hand_id.clone(),
            phase: self.phase,
            pot: self.pot,
            community_cards: self.community.clone(),
            current_bet: self.current_bet,
            action_on: None,
            players: self.players.iter().map(player_view).collect(),
            valid_actions: Vec::new(),
            min_raise_to: self.current_bet + self.big_blind,
            hole_cards: Vec::new(),
        }
    }

    fn post_blinds(&mut self) {
        self.phase = HandPhase::PostingBlinds;
        let (sb, bb) = blind_indices(self.players.len(), self.button);

        let paid = self.players[sb].commit(self.small_blind);
        self.pot += paid;
        self.history
            .push(&self.players[sb].wallet, self.phase, HandActionKind::PostSmallBlind, paid);

        let paid = self.players[bb].commit(self.big_blind);
        self.pot += paid;
        self.history
            .push(&self.players[bb].wallet, self.phase, HandActionKind::PostBigBlind, paid);

        // Анте платит только BB, мёртвыми фишками поверх блайнда.
        if !self.ante.is_zero() {
            let paid = self.players[bb].commit_dead(self.ante);
            self.pot += paid;
            self.history
                .push(&self.players[bb].wallet, self.phase, HandActionKind::PostAnte, paid);
        }

        self.current_bet = self.max_street_bet();
    }

    fn deal_hole_cards(&mut self) -> Result<(), HandError> {
        self.phase = HandPhase::Dealing;
        for player in self.players.iter_mut() {
            player.hole_cards = self.deck.deal(2)?;
        }
        Ok(())
    }

    fn deal_community(&mut self, count: i64) -> Result<(), HandError> {
        self.deck.burn()?;
        let cards = self.deck.deal(count)?;
        self.community.extend(cards);
        Ok(())
    }

    fn reset_bets_for_street(&mut self) {
        for player in self.players.iter_mut() {
            player.reset_for_street();
        }
        self.current_bet = Chips::ZERO;
    }

    fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active).count()
    }

    fn max_street_bet(&self) -> Chips {
        self.players
            .iter()
            .map(|p| p.current_bet)
            .max()
            .unwrap_or(Chips::ZERO)
    }

    /// Есть ли кому торговаться: двое могут ходить, либо единственный
    /// ещё не уравнял ставку олл-ина.
    fn betting_needed(&self) -> bool {
        if self.active_count() < 2 {
            return false;
        }
        let mut can_act = self.players.iter().filter(|p| p.can_act());
        match (can_act.next(), can_act.next()) {
            (Some(_), Some(_)) => true,
            (Some(only), None) => only.current_bet < self.current_bet,
            _ => false,
        }
    }

    async fn run_betting_round(
        &mut self,
        first_to_act: usize,
        decisions: &dyn DecisionSource,
    ) -> Result<(), HandError> {
        let players = std::mem::take(&mut self.players);
        let mut round = BettingRound::new(players, first_to_act, self.pot, self.big_blind);

        while let Some(player) = round.current_player() {
            let idx = round.state.action_on;
            let wallet = player.wallet.clone();
            let contributed_before = player.total_contributed;
            let state = self.betting_state(&round, &wallet);

            let proposed = decisions.decide(&wallet, &state).await;
            let (applied, substituted) = match round.apply_action(proposed) {
                Ok(()) => (proposed, false),
                Err(err) => {
                    let fallback = safe_fallback(&state);
                    warn!(
                        hand_id = %self.hand_id,
                        wallet = %wallet,
                        ?proposed,
                        ?fallback,
                        error = %err,
                        "invalid action replaced"
                    );
                    round
                        .apply_action(fallback)
                        .map_err(|e| HandError::Internal(e.to_string()))?;
                    (fallback, true)
                }
            };

            let paid = round.players()[idx].total_contributed - contributed_before;
            let raise_to = match applied {
                Action::RaiseTo(_) => Some(round.players()[idx].current_bet),
                _ => None,
            };
            self.history
                .push_full(&wallet, self.phase, applied.into(), paid, raise_to, substituted);
        }

        self.pot = round.pot();
        self.current_bet = round.current_bet();
        self.players = round.into_players();
        Ok(())
    }

    fn betting_state(&self, round: &BettingRound, wallet: &str) -> HandState {
        let hole_cards = round
            .players()
            .iter()
            .find(|p| p.wallet == wallet)
            .map(|p| p.hole_cards.clone())
            .unwrap_or_default();
        HandState {
            hand_id: self.hand_id.clone(),
            phase: self.phase,
            pot: round.pot(),
            community_cards: self.community.clone(),
            current_bet: round.current_bet(),
            action_on: Some(wallet.to_string()),
            players: round.players().iter().map(player_view).collect(),
            valid_actions: round.valid_actions(),
            min_raise_to: round.min_raise_to(),
            hole_cards,
        }
    }

    fn finish(mut self, starting_stacks: BTreeMap<Wallet, Chips>) -> Result<HandResult, HandError> {
        let active: Vec<usize> = (0..self.players.len())
            .filter(|&i| self.players[i].is_active)
            .collect();

        let mut final_hands = BTreeMap::new();
        let mut pots = Vec::new();
        let winners: BTreeMap<Wallet, Chips> = if let [only] = active.as_slice() {
            // Все остальные сфолдили: банк без вскрытия.
            BTreeMap::from([(self.players[*only].wallet.clone(), self.pot)])
        } else {
            self.phase = HandPhase::Showdown;
            let mut evaluated: Vec<(Wallet, EvaluatedHand)> = Vec::with_capacity(active.len());
            for &i in &active {
                let p = &self.players[i];
                evaluated.push((p.wallet.clone(), eval::evaluate(&p.hole_cards, &self.community)?));
            }
            let rankings = rank_hands(&evaluated);

            let contributions: Vec<Contribution> =
                self.players.iter().map(Contribution::from).collect();
            pots = side_pots::calculate(&contributions);
            final_hands = evaluated.into_iter().collect();
            side_pots::distribute(&pots, &rankings)
        };

        let awarded: Chips = winners.values().sum();
        if awarded != self.pot {
            return Err(HandError::Internal(format!(
                "pot {} distributed as {}",
                self.pot, awarded
            )));
        }
        for player in self.players.iter_mut() {
            if let Some(won) = winners.get(&player.wallet) {
                player.stack += *won;
            }
        }
        self.phase = HandPhase::Complete;

        let eliminations: Vec<Wallet> = self
            .players
            .iter()
            .filter(|p| p.stack.is_zero())
            .map(|p| p.wallet.clone())
            .collect();

        debug!(
            hand_id = %self.hand_id,
            pot = %self.pot,
            winners = ?winners,
            eliminated = eliminations.len(),
            "hand complete"
        );

        Ok(HandResult {
            hand_id: self.hand_id,
            winners,
            pot_total: self.pot,
            final_hands,
            side_pots: pots,
            eliminations,
            actions: self.history.into_actions(),
            community_cards: self.community,
            hole_cards: self
                .players
                .iter()
                .map(|p| (p.wallet.clone(), p.hole_cards.clone()))
                .collect(),
            starting_stacks,
            final_stacks: self
                .players
                .iter()
                .map(|p| (p.wallet.clone(), p.stack))
                .collect(),
        })
    }
}

fn player_view(p: &PlayerInHand) -> PlayerView {
    PlayerView {
        wallet: p.wallet.clone(),
        stack: p.stack,
        current_bet: p.current_bet,
        is_active: p.is_active,
        is_all_in: p.is_all_in,
        seat: p.seat,
    }
}

/// Плотный рейтинг рук (0 = лучшая), равные руки получают один ранг.
pub fn rank_hands(hands: &[(Wallet, EvaluatedHand)]) -> HashMap<Wallet, u32> {
    let mut sorted: Vec<&(Wallet, EvaluatedHand)> = hands.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut rankings = HashMap::with_capacity(hands.len());
    let mut rank = 0u32;
    let mut prev: Option<&EvaluatedHand> = None;
    for (wallet, hand) in sorted {
        if let Some(p) = prev {
            if hand != p {
                rank += 1;
            }
        }
        rankings.insert(wallet.clone(), rank);
        prev = Some(hand);
    }
    rankings
}
