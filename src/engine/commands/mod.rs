pub mod assign;
pub mod builtins;
pub mod system;

use crate::engine::ast::SimpleCommand;
use crate::engine::context::ShellContext;
use anyhow::Result;

pub trait Executable: Send + Sync {
    fn execute(&self, cmd: &SimpleCommand, ctx: &mut ShellContext) -> Result<i32>;
}
