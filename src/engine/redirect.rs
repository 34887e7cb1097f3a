use crate::engine::ast::SimpleCommand;
use crate::engine::expand::expand_with;
use anyhow::{Context, Result};
use nix::libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use nix::unistd::dup2;
use std::env;
use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

const FILE_MODE: u32 = 0o644;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Truncate,
    Append,
    // Create/truncate once, then reopen for appending. Used when stdout and
    // stderr name the same file so neither open clobbers the other's output.
    TruncateThenAppend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub mode: OpenMode,
}

impl Target {
    fn new(path: String, mode: OpenMode) -> Self {
        Self { path: PathBuf::from(path), mode }
    }

    pub fn open(&self) -> Result<File> {
        let mut opts = OpenOptions::new();
        match self.mode {
            OpenMode::Read => {
                opts.read(true);
            }
            OpenMode::Truncate => {
                opts.write(true).create(true).truncate(true).mode(FILE_MODE);
            }
            OpenMode::Append | OpenMode::TruncateThenAppend => {
                opts.write(true).create(true).append(true).mode(FILE_MODE);
            }
        }
        if self.mode == OpenMode::TruncateThenAppend {
            Target { path: self.path.clone(), mode: OpenMode::Truncate }.open()?;
        }
        opts.open(&self.path)
            .with_context(|| format!("Failed to open file: {}", self.path.display()))
    }

    // open + duplicate onto `fd` + close the original
    fn install(&self, fd: RawFd) -> Result<()> {
        let file = self.open()?;
        dup2(file.as_raw_fd(), fd)
            .with_context(|| format!("Failed to redirect fd {} to {}", fd, self.path.display()))?;
        Ok(())
    }
}

/// Final open decisions for a command's input, output and error targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirections {
    pub input: Option<Target>,
    pub output: Option<Target>,
    pub error: Option<Target>,
}

impl Redirections {
    pub fn resolve(cmd: &SimpleCommand) -> Self {
        Self::resolve_with(cmd, |name| env::var_os(name).map(|v| v.to_string_lossy().into_owned()))
    }

    pub fn resolve_with<F>(cmd: &SimpleCommand, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let input = cmd.input.as_ref().map(|w| expand_with(w, &lookup));
        let output = cmd.output.as_ref().map(|w| expand_with(w, &lookup));
        let error = cmd.error.as_ref().map(|w| expand_with(w, &lookup));

        // The merge rule wins over the append flags.
        let merged = matches!((&output, &error), (Some(o), Some(e)) if o == e);

        let output_mode = if merged {
            OpenMode::TruncateThenAppend
        } else if cmd.io.out_append {
            OpenMode::Append
        } else {
            OpenMode::Truncate
        };
        let error_mode = if merged || cmd.io.err_append {
            OpenMode::Append
        } else {
            OpenMode::Truncate
        };

        Self {
            input: input.map(|p| Target::new(p, OpenMode::Read)),
            output: output.map(|p| Target::new(p, output_mode)),
            error: error.map(|p| Target::new(p, error_mode)),
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none() && self.error.is_none()
    }

    /// Rewires fds 0, 1 and 2 of the calling process. Only ever called in a forked child.
    pub fn apply(&self) -> Result<()> {
        if let Some(t) = &self.input {
            t.install(STDIN_FILENO)?;
        }
        if let Some(t) = &self.output {
            t.install(STDOUT_FILENO)?;
        }
        if let Some(t) = &self.error {
            t.install(STDERR_FILENO)?;
        }
        Ok(())
    }

    /// Creates and truncates the output and error targets without installing them.
    pub fn touch_outputs(&self) -> Result<()> {
        for t in [&self.output, &self.error].into_iter().flatten() {
            Target { path: t.path.clone(), mode: OpenMode::Truncate }.open()?;
        }
        Ok(())
    }
}
