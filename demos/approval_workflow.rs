//! Document Approval Workflow
//!
//! Drives a document through draft -> review -> approved with guarded
//! transitions and an approval-counting action, while listeners print
//! every event the machine announces.
//!
//! Key concepts:
//! - Guards enforce business rules (two approvals required)
//! - Actions mutate the caller-owned context
//! - Listeners observe the transition lifecycle
//!
//! Run with: cargo run --example approval_workflow

use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use turnstile::{
    DefinitionError, EventKind, Listener, MachineEvent, ScriptedState, ScriptedTransition,
    StateMachine, TransitionResult,
};

#[derive(Debug, Default)]
struct ReviewContext {
    approvals: u32,
}

fn main() -> Result<(), DefinitionError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Document Approval Workflow ===\n");

    let mut machine: StateMachine<ReviewContext> = StateMachine::new(ReviewContext::default());

    machine.add_state(ScriptedState::new("draft"), true)?;
    machine.add_state(
        ScriptedState::new("review")
            .with_enter(|_: &mut ReviewContext| println!("  [Hook] review round opened")),
        false,
    )?;
    machine.add_state(ScriptedState::new("approved"), false)?;
    machine.add_state(ScriptedState::new("rejected"), false)?;

    machine.add_transition(ScriptedTransition::new("draft", "review", "submit"))?;
    machine.add_transition(
        ScriptedTransition::new("review", "review", "add_approval")
            .perform(|review: &mut ReviewContext, _| review.approvals += 1),
    )?;
    machine.add_transition(
        ScriptedTransition::new("review", "approved", "approve")
            .when(|review: &ReviewContext, _| review.approvals >= 2),
    )?;
    machine.add_transition(ScriptedTransition::new("review", "rejected", "reject"))?;

    let narrator: Listener = Arc::new(|event: &MachineEvent| match event {
        MachineEvent::TransitionComplete {
            source,
            target,
            trigger,
        } => println!("  [Event] {source} --{trigger}--> {target}"),
        MachineEvent::GuardFailed { state, trigger } => {
            println!("  [Event] guard vetoed '{trigger}' in '{state}'");
        }
        MachineEvent::Reset { initial } => println!("  [Event] reset to '{initial}'"),
        _ => {}
    });
    machine.add_event_listener(EventKind::TransitionComplete, Arc::clone(&narrator));
    machine.add_event_listener(EventKind::GuardFailed, Arc::clone(&narrator));
    machine.add_event_listener(EventKind::Reset, narrator);

    println!("Step 1: Submit for review");
    machine.trigger("submit", None)?;

    println!("\nStep 2: Try to approve with no approvals collected");
    let early = machine.trigger("approve", None)?;
    println!("  outcome: {early:?}");

    println!("\nStep 3: Collect two approvals");
    machine.trigger("add_approval", None)?;
    machine.trigger("add_approval", None)?;
    println!("  approvals so far: {}", machine.context().approvals);

    println!("\nStep 4: Approve");
    let outcome = machine.trigger("approve", None)?;
    assert_eq!(outcome, TransitionResult::Success);

    println!("\nFinal state: {}", machine.current_state_name()?);
    println!("Path taken: {:?}", machine.history().path());
    if let Some(elapsed) = machine.history().duration() {
        println!("Elapsed: {elapsed:?}");
    }

    println!("\nStep 5: Reset for the next document");
    machine.reset()?;
    println!("Current state: {}", machine.current_state_name()?);

    println!("\n=== Example Complete ===");
    Ok(())
}
