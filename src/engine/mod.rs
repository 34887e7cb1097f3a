pub mod ast;
pub mod commands;
pub mod context;
pub mod executor;
pub mod expand;
pub mod operators;
pub mod process;
pub mod redirect;

use crate::config::EngineConfig;
use ast::Command;
use context::{Frame, ShellContext};
use executor::Evaluator;


/// Evaluates `tree` and returns its exit status.
///
/// `depth` and `parent` only position the tree for diagnostics; pass `0` and
/// `None` for a top-level tree.
pub fn evaluate(
    tree: &Command,
    depth: usize,
    parent: Option<&Command>,
    ctx: &mut ShellContext,
    config: &EngineConfig,
) -> i32 {
    Evaluator::new(ctx, config).eval(tree, Frame::new(depth, parent)).status()
}

// Forking, chdir and setenv all act on the one test process; tests that do any
// of them run one at a time.
#[cfg(test)]
pub(crate) fn serial() -> std::sync::MutexGuard<'static, ()> {
    static PROCESS_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
