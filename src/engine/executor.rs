use crate::config::EngineConfig;
use crate::engine::ast::{Command, Operator, SimpleCommand};
use crate::engine::commands::Executable;
use crate::engine::commands::assign::Assignment;
use crate::engine::commands::system::{SystemCommand, run_bare};
use crate::engine::context::{Frame, ShellContext};
use crate::engine::operators::{self, Spawn, SyncOutcome};
use crate::engine::process::{self, FAILURE, Pipe, Wiring};
use anyhow::Result;
use log::{debug, error};
use nix::unistd::Pid;

/// Result of evaluating one node. Parallel compositions report synchronization,
/// which is kept distinct from a computed exit status until the caller asks for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Exited(i32),
    Synced(SyncOutcome),
}

impl Outcome {
    pub fn status(self) -> i32 {
        match self {
            Outcome::Exited(code) => code,
            Outcome::Synced(sync) => sync.status(),
        }
    }
}

pub struct Evaluator<'a> {
    ctx: &'a mut ShellContext,
    config: &'a EngineConfig,
}

impl<'a> Evaluator<'a> {
    pub fn new(ctx: &'a mut ShellContext, config: &'a EngineConfig) -> Self {
        Self { ctx, config }
    }

    pub fn eval<'t>(&mut self, cmd: &'t Command, frame: Frame<'t>) -> Outcome {
        if frame.depth > self.config.max_depth {
            error!("refusing to evaluate below depth {}", self.config.max_depth);
            return Outcome::Exited(FAILURE);
        }

        let (op, cmd1, cmd2) = match cmd {
            Command::Simple(scmd) => return Outcome::Exited(self.eval_leaf(scmd, frame)),
            Command::Node { op, cmd1, cmd2 } => (*op, cmd1.as_ref(), cmd2.as_ref()),
        };
        debug!("{:indent$}{} (depth {})", "", op.symbol(), frame.depth, indent = frame.depth * 2);

        let child = frame.descend(cmd);
        let left = |ev: &mut Self| ev.eval(cmd1, child).status();
        let right = |ev: &mut Self| ev.eval(cmd2, child).status();

        match op {
            Operator::Sequential => Outcome::Exited(operators::sequential(self, left, right)),
            Operator::CondZero => Outcome::Exited(operators::cond_zero(self, left, right)),
            Operator::CondNzero => Outcome::Exited(operators::cond_nzero(self, left, right)),
            Operator::Pipe => match operators::pipe(self, left, right) {
                Ok(code) => Outcome::Exited(code),
                Err(e) => {
                    error!("pipe: {:#}", e);
                    Outcome::Exited(FAILURE)
                }
            },
            Operator::Parallel => match operators::parallel(self, left, right) {
                Ok(sync) => Outcome::Synced(sync),
                Err(e) => {
                    error!("parallel: {:#}", e);
                    Outcome::Synced(SyncOutcome::Failed)
                }
            },
        }
    }

    fn eval_leaf(&mut self, scmd: &SimpleCommand, frame: Frame<'_>) -> i32 {
        debug!(
            "{:indent$}{} (depth {}, under {})",
            "",
            scmd,
            frame.depth,
            frame.parent.and_then(Command::op).map_or("root", Operator::symbol),
            indent = frame.depth * 2
        );
        match self.run_simple(scmd) {
            Ok(code) => code,
            Err(e) => {
                error!("{:#}", e);
                FAILURE
            }
        }
    }

    fn run_simple(&mut self, scmd: &SimpleCommand) -> Result<i32> {
        if scmd.verb.is_empty() {
            return Ok(0);
        }
        if let Some(assignment) = Assignment::parse(&scmd.verb)? {
            return assignment.apply(self.ctx);
        }

        if self.config.fast_path && is_bare(scmd) {
            if let Some(verb @ ("true" | "false")) = scmd.verb.as_literal() {
                return run_bare(verb);
            }
        }

        // Built-ins are named literally; `$V` expanding to "cd" is an external.
        let registry = self.ctx.registry.clone();
        if let Some(cmd) = scmd.verb.as_literal().and_then(|v| registry.get(v)) {
            cmd.execute(scmd, self.ctx)
        } else {
            SystemCommand.execute(scmd, self.ctx)
        }
    }
}

fn is_bare(scmd: &SimpleCommand) -> bool {
    scmd.verb.0.len() == 1
        && scmd.params.is_empty()
        && scmd.input.is_none()
        && scmd.output.is_none()
        && scmd.error.is_none()
}

impl Spawn for Evaluator<'_> {
    type Child = Pid;
    type Pipe = Pipe;

    fn pipe(&mut self) -> Result<Pipe> {
        Pipe::open()
    }

    fn spawn<F>(&mut self, wiring: Wiring<'_, Pipe>, branch: F) -> Result<Pid>
    where
        F: FnOnce(&mut Self) -> i32,
    {
        process::fork_child(wiring, || branch(self))
    }

    fn close_pipe(&mut self, pipe: Pipe) {
        drop(pipe);
    }

    fn wait(&mut self, child: Pid) -> Result<i32> {
        process::wait_status(child)
    }
}
