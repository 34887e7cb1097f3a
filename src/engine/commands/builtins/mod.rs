pub mod cd;
pub mod exit;
pub mod pwd;

use crate::engine::context::ShellContext;

/// Helper to register all built-in commands at once
pub fn register_all_builtins(ctx: &mut ShellContext) {
    // Env/Navigation
    ctx.register_command("cd", Box::new(cd::CdCommand));
    ctx.register_command("pwd", Box::new(pwd::PwdCommand));

    // Session
    ctx.register_command("exit", Box::new(exit::ExitCommand));
    ctx.register_command("quit", Box::new(exit::ExitCommand));
}
