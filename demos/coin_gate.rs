//! Coin-Operated Gate
//!
//! The classic turnstile: locked until a coin arrives, locked again
//! after a push. Shows rejected triggers, a guard that reads the
//! context, and the read-only queries.
//!
//! Run with: cargo run --example coin_gate

use tracing_subscriber::EnvFilter;
use turnstile::{DefinitionError, ScriptedState, ScriptedTransition, StateMachine};

#[derive(Debug, Default)]
struct GateStats {
    coins: u32,
    entries: u32,
    jammed: bool,
}

fn main() -> Result<(), DefinitionError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    println!("=== Coin-Operated Gate ===\n");

    let mut gate: StateMachine<GateStats> = StateMachine::new(GateStats::default());

    gate.add_state(ScriptedState::new("locked"), true)?;
    gate.add_state(ScriptedState::new("unlocked"), false)?;

    gate.add_transition(
        ScriptedTransition::new("locked", "unlocked", "coin")
            .when(|stats: &GateStats, _| !stats.jammed)
            .perform(|stats: &mut GateStats, _| stats.coins += 1),
    )?;
    gate.add_transition(
        ScriptedTransition::new("unlocked", "locked", "push")
            .perform(|stats: &mut GateStats, _| stats.entries += 1),
    )?;

    println!("Current state: {}", gate.current_state_name()?);
    println!("Permitted triggers: {:?}", gate.permitted_triggers()?);

    println!("\nPush without paying:");
    println!("  outcome: {:?}", gate.trigger("push", None)?);

    println!("\nInsert a coin:");
    println!("  outcome: {:?}", gate.trigger("coin", None)?);
    println!("  state: {}", gate.current_state_name()?);

    println!("\nPush through:");
    println!("  outcome: {:?}", gate.trigger("push", None)?);
    println!("  state: {}", gate.current_state_name()?);

    println!("\nJam the coin slot and try again:");
    gate.context_mut().jammed = true;
    println!("  outcome: {:?}", gate.trigger("coin", None)?);
    gate.context_mut().jammed = false;

    println!("\nReset at end of day:");
    gate.reset()?;
    println!("  state: {}", gate.current_state_name()?);
    println!("  path: {:?}", gate.history().path());

    let stats = gate.context();
    println!("\nTotals: {} coins, {} entries", stats.coins, stats.entries);

    println!("\n=== Example Complete ===");
    Ok(())
}
