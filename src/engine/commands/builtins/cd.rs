// Cd command

use crate::engine::ast::SimpleCommand;
use crate::engine::commands::Executable;
use crate::engine::context::ShellContext;
use crate::engine::expand::expand;
use crate::engine::redirect::Redirections;
use anyhow::Result;
use log::{info, warn};
use std::path::Path;

pub struct CdCommand;

impl Executable for CdCommand {
    fn execute(&self, cmd: &SimpleCommand, ctx: &mut ShellContext) -> Result<i32> {
        // cd writes nothing, but its output targets are still created and truncated.
        Redirections::resolve(cmd).touch_outputs()?;

        match cmd.params.as_slice() {
            [] => Ok(0),
            [dir] => {
                let target = expand(dir);
                match ctx.change_dir(Path::new(&target)) {
                    Ok(()) => {
                        info!("cd: now in {}", target);
                        Ok(0)
                    }
                    Err(e) => {
                        warn!("{:#}", e);
                        Ok(1)
                    }
                }
            }
            _ => {
                warn!("cd: expected a single directory, got {} words", cmd.params.len());
                Ok(1)
            }
        }
    }
}
