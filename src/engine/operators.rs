//! Composition operators as functions of two branch evaluators and a spawning
//! capability. Nothing here touches the OS directly; the evaluator supplies a
//! forking [`Spawn`] implementation, tests supply an in-process one.

use crate::engine::process::Wiring;
use anyhow::Result;

/// Process-level capability the pipe and parallel operators need.
pub trait Spawn: Sized {
    type Child;
    type Pipe;

    fn pipe(&mut self) -> Result<Self::Pipe>;

    /// Starts `branch` as an independent child with the given descriptor wiring.
    fn spawn<F>(&mut self, wiring: Wiring<'_, Self::Pipe>, branch: F) -> Result<Self::Child>
    where
        F: FnOnce(&mut Self) -> i32;

    /// Releases the creator's copy of both pipe ends.
    fn close_pipe(&mut self, pipe: Self::Pipe);

    fn wait(&mut self, child: Self::Child) -> Result<i32>;
}

/// What a parallel composition reports: whether both children could be reaped,
/// not what they computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced,
    Failed,
}

impl SyncOutcome {
    pub fn status(self) -> i32 {
        match self {
            SyncOutcome::Synced => 0,
            SyncOutcome::Failed => 1,
        }
    }
}

pub fn sequential<S, L, R>(state: &mut S, left: L, right: R) -> i32
where
    L: FnOnce(&mut S) -> i32,
    R: FnOnce(&mut S) -> i32,
{
    left(state);
    right(state)
}

/// `left && right`. A skipped `right` yields 0, not `left`'s status.
pub fn cond_zero<S, L, R>(state: &mut S, left: L, right: R) -> i32
where
    L: FnOnce(&mut S) -> i32,
    R: FnOnce(&mut S) -> i32,
{
    if left(state) == 0 { right(state) } else { 0 }
}

/// `left || right`. A skipped `right` yields 0.
pub fn cond_nzero<S, L, R>(state: &mut S, left: L, right: R) -> i32
where
    L: FnOnce(&mut S) -> i32,
    R: FnOnce(&mut S) -> i32,
{
    if left(state) != 0 { right(state) } else { 0 }
}

/// `left | right`: status of the right-hand stage.
pub fn pipe<S, L, R>(state: &mut S, left: L, right: R) -> Result<i32>
where
    S: Spawn,
    L: FnOnce(&mut S) -> i32,
    R: FnOnce(&mut S) -> i32,
{
    let pipe = state.pipe()?;
    let writer = match state.spawn(Wiring::StdoutTo(&pipe), left) {
        Ok(child) => child,
        Err(e) => {
            state.close_pipe(pipe);
            return Err(e);
        }
    };
    let reader = state.spawn(Wiring::StdinFrom(&pipe), right);
    // The parent must drop both ends before waiting or the reader never hits EOF.
    state.close_pipe(pipe);

    match reader {
        Ok(reader) => {
            state.wait(writer).ok();
            state.wait(reader)
        }
        Err(e) => {
            state.wait(writer).ok();
            Err(e)
        }
    }
}

/// `left & right`: both branches run concurrently with inherited descriptors.
pub fn parallel<S, L, R>(state: &mut S, left: L, right: R) -> Result<SyncOutcome>
where
    S: Spawn,
    L: FnOnce(&mut S) -> i32,
    R: FnOnce(&mut S) -> i32,
{
    let first = state.spawn(Wiring::Inherit, left)?;
    let second = match state.spawn(Wiring::Inherit, right) {
        Ok(child) => child,
        Err(e) => {
            state.wait(first).ok();
            return Err(e);
        }
    };
    let first_ok = state.wait(first).is_ok();
    let second_ok = state.wait(second).is_ok();
    Ok(if first_ok && second_ok { SyncOutcome::Synced } else { SyncOutcome::Failed })
}
