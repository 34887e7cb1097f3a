// NAME=value

use crate::engine::ast::{Word, WordPart};
use crate::engine::context::ShellContext;
use crate::engine::expand::expand;
use anyhow::{Result, bail};
use log::info;

/// An environment assignment recognised from a verb of the form `NAME`, `=`, value fragments...
#[derive(Debug, PartialEq)]
pub struct Assignment<'a> {
    pub name: &'a str,
    pub value: Word,
}

impl<'a> Assignment<'a> {
    /// `Ok(None)` when the verb is not an assignment; an error when it is one with no value.
    pub fn parse(verb: &'a Word) -> Result<Option<Self>> {
        let (name, rest) = match verb.0.as_slice() {
            [WordPart::Literal(name), WordPart::Literal(eq), rest @ ..] if eq == "=" => (name.as_str(), rest),
            _ => return Ok(None),
        };
        if rest.is_empty() {
            bail!("malformed assignment: nothing after '{}='", name);
        }
        Ok(Some(Self { name, value: Word(rest.to_vec()) }))
    }

    /// Installs the expanded value into the interpreter's own environment. Never forks.
    pub fn apply(&self, ctx: &mut ShellContext) -> Result<i32> {
        let value = expand(&self.value);
        ctx.set_var(self.name, &value)?;
        info!("{}={}", self.name, value);
        Ok(0)
    }
}
