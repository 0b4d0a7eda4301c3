//! Generic saga runner: an ordered list of steps, each with a compensating
//! action, executed strictly sequentially.
//!
//! On a forward failure, compensations for all previously committed steps run
//! in reverse order, best-effort. A failed compensation is logged for
//! operator follow-up and never replaces the original step error. There is no
//! durable saga log: a process crash between steps requires manual cleanup.

use std::fmt::Display;
use tracing::{error, warn};

/// One step of a saga: a forward action that mutates the shared context and
/// a compensating action that semantically undoes it.
pub struct SagaStep<C, E> {
    pub name: &'static str,
    forward: Box<dyn Fn(&mut C) -> Result<(), E>>,
    compensate: Box<dyn Fn(&C) -> anyhow::Result<()>>,
}

impl<C, E> SagaStep<C, E> {
    pub fn new(
        name: &'static str,
        forward: impl Fn(&mut C) -> Result<(), E> + 'static,
        compensate: impl Fn(&C) -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            name,
            forward: Box::new(forward),
            compensate: Box::new(compensate),
        }
    }
}

/// Run the steps in order. Step N+1 never starts before step N has
/// committed. Returns the failing step's error after the compensation
/// cascade has run; compensation is not retried.
pub fn run_saga<C, E: Display>(ctx: &mut C, steps: &[SagaStep<C, E>]) -> Result<(), E> {
    for (index, step) in steps.iter().enumerate() {
        if let Err(err) = (step.forward)(ctx) {
            warn!(step = step.name, error = %err, "Saga step failed, compensating committed steps");
            for committed in steps[..index].iter().rev() {
                if let Err(comp_err) = (committed.compensate)(ctx) {
                    // Operational alert: the forward error still wins.
                    error!(
                        step = committed.name,
                        error = %comp_err,
                        "Saga compensation failed, manual cleanup required"
                    );
                }
            }
            return Err(err);
        }
    }
    Ok(())
}
