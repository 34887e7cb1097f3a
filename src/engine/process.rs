// Thin wrappers over fork/pipe/dup2/waitpid.

use anyhow::{Context, Result};
use log::error;
use nix::errno::Errno;
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, close, dup2, fork};
use std::io::Write;
use std::os::fd::{AsRawFd, OwnedFd};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Status reported when a leaf or primitive fails before producing its own.
pub const FAILURE: i32 = 1;

/// Both ends of an anonymous pipe, owned by the process that created it.
pub struct Pipe {
    pub read: OwnedFd,
    pub write: OwnedFd,
}

impl Pipe {
    pub fn open() -> Result<Self> {
        let (read, write) = nix::unistd::pipe().context("Failed to create pipe")?;
        Ok(Self { read, write })
    }
}

/// How a forked child's standard descriptors relate to a pipe.
pub enum Wiring<'a, P> {
    Inherit,
    StdoutTo(&'a P),
    StdinFrom(&'a P),
}

fn wire(wiring: &Wiring<'_, Pipe>) -> Result<()> {
    let (pipe, target) = match wiring {
        Wiring::Inherit => return Ok(()),
        Wiring::StdoutTo(p) => (p, STDOUT_FILENO),
        Wiring::StdinFrom(p) => (p, STDIN_FILENO),
    };
    let end = if target == STDOUT_FILENO { &pipe.write } else { &pipe.read };
    dup2(end.as_raw_fd(), target).context("Failed to wire pipe end")?;
    // Both originals must go, or the reader never sees end-of-file.
    close(pipe.read.as_raw_fd()).ok();
    close(pipe.write.as_raw_fd()).ok();
    Ok(())
}

pub fn flush_std() {
    std::io::stdout().flush().ok();
    std::io::stderr().flush().ok();
}

/// Forks and runs `body` in the child, which exits with the returned status.
///
/// The child never returns from this function: it leaves through `_exit`, so
/// descriptors owned by caller frames are not closed twice and no destructor runs
/// against state shared with the parent.
pub fn fork_child<F>(wiring: Wiring<'_, Pipe>, body: F) -> Result<Pid>
where
    F: FnOnce() -> i32,
{
    flush_std();
    // SAFETY: the child only runs evaluator code and then `_exit`s; the engine
    // never forks while holding locks of its own.
    match unsafe { fork() }.context("Failed to fork")? {
        ForkResult::Parent { child } => Ok(child),
        ForkResult::Child => {
            let status = match wire(&wiring) {
                Ok(()) => catch_unwind(AssertUnwindSafe(body)).unwrap_or(FAILURE),
                Err(e) => {
                    error!("{:#}", e);
                    FAILURE
                }
            };
            flush_std();
            // SAFETY: `_exit` skips atexit handlers and destructors; nothing in
            // the child needs them after the flush above.
            unsafe { nix::libc::_exit(status) }
        }
    }
}

/// Blocks until `pid` terminates and converts its wait status to an exit status.
pub fn wait_status(pid: Pid) -> Result<i32> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(code),
            Ok(WaitStatus::Signaled(_, sig, _)) => return Ok(128 + sig as i32),
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e).with_context(|| format!("Failed to wait for child {}", pid)),
        }
    }
}

/// Runs `body` in a forked child and waits for it.
pub fn run_child<F>(body: F) -> Result<i32>
where
    F: FnOnce() -> i32,
{
    let pid = fork_child(Wiring::Inherit, body)?;
    wait_status(pid)
}
