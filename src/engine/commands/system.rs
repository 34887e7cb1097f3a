// System command

use crate::engine::ast::{SimpleCommand, Word};
use crate::engine::commands::Executable;
use crate::engine::context::ShellContext;
use crate::engine::expand::{expand, expand_all};
use crate::engine::process::{FAILURE, run_child};
use crate::engine::redirect::Redirections;
use anyhow::{Context, Result};
use log::debug;
use nix::unistd::execvp;
use std::ffi::CString;
use std::io::Write;

/// Anything that is neither a built-in nor an assignment: fork, redirect, exec.
pub struct SystemCommand;

impl Executable for SystemCommand {
    fn execute(&self, cmd: &SimpleCommand, _ctx: &mut ShellContext) -> Result<i32> {
        let verb = expand(&cmd.verb);
        let argv = build_argv(&verb, &cmd.params)?;
        let redirections = Redirections::resolve(cmd);
        debug!("launching {:?}", argv);

        run_child(|| {
            if let Err(e) = redirections.apply() {
                eprintln!("{}: {:#}", verb, e);
                return FAILURE;
            }
            exec(&verb, &argv)
        })
    }
}

/// `[verb, expand(param_1), expand(param_2), ...]`
pub fn build_argv(verb: &str, params: &[Word]) -> Result<Vec<CString>> {
    std::iter::once(verb.to_string())
        .chain(expand_all(params))
        .map(|arg| CString::new(arg).context("argument contains a NUL byte"))
        .collect()
}

/// Replaces the process image. Returns only if that failed, with the status the child should exit with.
pub fn exec(verb: &str, argv: &[CString]) -> i32 {
    if let Some(program) = argv.first() {
        if let Err(errno) = execvp(program, argv) {
            debug!("execvp {}: {}", verb, errno);
        }
    }
    // Written to the (possibly redirected) stdout, like the command's own output would be.
    let mut out = std::io::stdout();
    writeln!(out, "Execution failed for '{}'", verb).ok();
    out.flush().ok();
    FAILURE
}

/// Fast path for a bare `true` / `false`: fork and exec with no arguments or redirections.
pub fn run_bare(verb: &str) -> Result<i32> {
    let argv = build_argv(verb, &[])?;
    run_child(|| exec(verb, &argv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ast::WordPart;

    #[test]
    fn test_build_argv_without_params() {
        let argv = build_argv("ls", &[]).unwrap();
        assert_eq!(argv, vec![CString::new("ls").unwrap()]);
    }

    #[test]
    fn test_build_argv_concatenates_fragments() {
        let _guard = crate::engine::serial();
        let params = vec![
            Word::literal("-l"),
            Word(vec![
                WordPart::Literal("/nonexistent/".into()),
                WordPart::Var("FORKSH_SURELY_UNSET_VAR".into()),
                WordPart::Literal("x".into()),
            ]),
        ];
        let argv = build_argv("ls", &params).unwrap();
        let args: Vec<_> = argv.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(args, vec!["ls", "-l", "/nonexistent/x"]);
    }

    #[test]
    fn test_build_argv_rejects_nul() {
        assert!(build_argv("ls", &[Word::literal("a\0b")]).is_err());
    }
}
