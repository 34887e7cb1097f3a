// Exit command

use crate::engine::ast::SimpleCommand;
use crate::engine::commands::Executable;
use crate::engine::context::ShellContext;
use crate::engine::process::flush_std;
use anyhow::Result;
use log::info;

/// `exit` / `quit`: ends the whole interpreter process with status 0. Arguments are ignored.
pub struct ExitCommand;

impl Executable for ExitCommand {
    fn execute(&self, _cmd: &SimpleCommand, _ctx: &mut ShellContext) -> Result<i32> {
        info!("exit requested");
        flush_std();
        std::process::exit(0);
    }
}
