//! Симуляция полного турнира со скриптовыми ботами.
//!
//! Время двигается вручную (`--seconds-per-round` за раунд), поэтому прогон
//! с одинаковыми параметрами всегда даёт одинаковый результат.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::Parser;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use poker_arena::domain::{BlindStructure, Chips, TournamentConfig};
use poker_arena::engine::{Action, ActionType, DecisionSource, HandState};
use poker_arena::infra::{DeterministicRng, ManualClock, RngSeed};
use poker_arena::tournament::{payout_fixture, TournamentManager};

#[derive(Debug, Parser)]
#[command(author, version, about = "Run a seeded poker tournament with scripted bots", long_about = None)]
struct Args {
    /// Number of registered players
    #[arg(long, default_value_t = 27)]
    players: usize,

    /// Blind template: turbo, standard, deep_stack
    #[arg(long, default_value = "turbo")]
    blinds: String,

    /// Payout fixture: standard_27, top_heavy_27, flat_27
    #[arg(long, default_value = "standard_27")]
    payouts: String,

    /// Text hashed into the 32-byte blockhash commitment
    #[arg(long, env = "ARENA_SEED", default_value = "arena")]
    seed: String,

    /// Tournament config as JSON (overrides blinds/payouts/seed)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 10_000)]
    starting_stack: u64,

    /// Simulated seconds that pass between rounds
    #[arg(long, default_value_t = 30)]
    seconds_per_round: u64,

    /// Bot RNG seed
    #[arg(long, default_value_t = 7)]
    bot_seed: u64,

    /// Give up after this many rounds
    #[arg(long, default_value_t = 100_000)]
    max_rounds: u64,
}

/// Бот: иногда олл-ин, обычно check/call, дорогие ставки иногда фолдит.
struct ScriptedBot {
    rng: Mutex<DeterministicRng>,
}

#[async_trait]
impl DecisionSource for ScriptedBot {
    async fn decide(&self, _wallet: &str, state: &HandState) -> Action {
        let mut rng = self.rng.lock().await;
        let Some(me) = state.acting_player() else {
            return Action::Fold;
        };

        if state.can(ActionType::Raise) && rng.chance(0.06) {
            return Action::RaiseTo(me.current_bet + me.stack);
        }
        if state.can(ActionType::Check) {
            return Action::Check;
        }
        let to_call = state.to_call();
        if to_call.0 * 3 <= me.stack.0 || rng.chance(0.4) {
            Action::Call
        } else {
            Action::Fold
        }
    }
}

fn build_config(args: &Args) -> Result<TournamentConfig> {
    if let Some(path) = &args.config {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        return serde_json::from_str(&raw).context("parsing tournament config");
    }

    let blind_structure = BlindStructure::from_template(&args.blinds).map_err(anyhow::Error::msg)?;
    let payout_structure: BTreeMap<u32, i64> = payout_fixture(&args.payouts)?;
    Ok(TournamentConfig {
        tournament_id: format!("sim_{}", args.seed),
        name: "Arena simulation".to_string(),
        starting_stack: Chips(args.starting_stack),
        blind_structure,
        payout_structure,
        max_players: args.players.max(2),
        min_players: 2,
        blockhash: RngSeed::hash_of(args.seed.as_bytes()).bytes.to_vec(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let clock = ManualClock::new(0);

    let mut manager = TournamentManager::new(config, Arc::new(clock.clone()))?;
    manager.open_registration()?;
    for i in 0..args.players {
        manager.register_player(&format!("agent_{:03}", i + 1), "free")?;
    }
    manager.start()?;

    let bot = ScriptedBot {
        rng: Mutex::new(DeterministicRng::from_u64(args.bot_seed)),
    };

    let mut rounds = 0u64;
    while manager.phase().is_running() {
        if rounds >= args.max_rounds {
            bail!("tournament did not finish in {} rounds", args.max_rounds);
        }
        clock.advance_secs(args.seconds_per_round);
        manager.play_round(&bot).await?;
        rounds += 1;
    }

    info!(rounds, hands = manager.hands_completed(), "simulation finished");

    let report = serde_json::json!({
        "state": manager.state(),
        "rounds": rounds,
        "standings": manager.standings(),
        "eliminations": manager.eliminations(),
        "awards": manager.awards(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
