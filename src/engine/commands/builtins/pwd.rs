// Pwd command

use crate::engine::ast::SimpleCommand;
use crate::engine::commands::Executable;
use crate::engine::context::ShellContext;
use crate::engine::process::{FAILURE, run_child};
use crate::engine::redirect::Redirections;
use anyhow::Result;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;

/// Forks so the child can honour redirections the same way external commands do.
pub struct PwdCommand;

impl Executable for PwdCommand {
    fn execute(&self, cmd: &SimpleCommand, ctx: &mut ShellContext) -> Result<i32> {
        let redirections = Redirections::resolve(cmd);
        let ctx = &*ctx;
        run_child(|| match print_cwd(ctx, &redirections) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("pwd: {:#}", e);
                FAILURE
            }
        })
    }
}

fn print_cwd(ctx: &ShellContext, redirections: &Redirections) -> Result<()> {
    redirections.apply()?;
    let cwd = ctx.current_dir()?;
    let mut out = std::io::stdout().lock();
    out.write_all(cwd.as_os_str().as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
