use crate::engine::ast::Command;
use crate::engine::commands::Executable;
use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handle on the interpreter's process-wide state: environment, working
/// directory and the built-in registry.
///
/// The environment and working directory belong to the OS process. Every leaf
/// reads them implicitly; only the built-ins and assignment write them, through
/// [`ShellContext::set_var`] and [`ShellContext::change_dir`].
#[derive(Clone)]
pub struct ShellContext {
    pub registry: Arc<HashMap<String, Box<dyn Executable + Send + Sync>>>,
}

impl ShellContext {
    pub fn new() -> Self {
        let mut ctx = Self { registry: Arc::new(HashMap::new()) };
        crate::engine::commands::builtins::register_all_builtins(&mut ctx);
        ctx
    }

    pub fn register_command(&mut self, name: &str, command: Box<dyn Executable + Send + Sync>) {
        if let Some(map) = Arc::get_mut(&mut self.registry) {
            map.insert(name.to_string(), command);
        } else {
            // This should not happen during initialization phase
            panic!("Cannot register command: Registry is shared");
        }
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    pub fn set_var(&mut self, name: &str, value: &str) -> Result<()> {
        if name.is_empty() || name.contains(['=', '\0']) {
            bail!("invalid variable name: {:?}", name);
        }
        if value.contains('\0') {
            bail!("value for {} contains a NUL byte", name);
        }
        // SAFETY: the evaluator is single-threaded; concurrent branches run in
        // forked processes with their own copy of the environment. Tests that
        // read or write the environment hold `engine::serial()`.
        unsafe { env::set_var(name, value) };
        Ok(())
    }

    pub fn current_dir(&self) -> Result<PathBuf> {
        env::current_dir().context("Failed to read current directory")
    }

    pub fn change_dir(&mut self, path: &Path) -> Result<()> {
        env::set_current_dir(path).with_context(|| format!("cd: {}", path.display()))
    }
}

impl Default for ShellContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of a node in the tree being evaluated. Diagnostic only.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'t> {
    pub depth: usize,
    pub parent: Option<&'t Command>,
}

impl<'t> Frame<'t> {
    pub fn new(depth: usize, parent: Option<&'t Command>) -> Self {
        Self { depth, parent }
    }

    /// Frame for the children of `node`.
    pub fn descend(self, node: &'t Command) -> Self {
        Self { depth: self.depth + 1, parent: Some(node) }
    }
}
