use serde::Deserialize;
use std::fmt;

/// One fragment of a token: literal text or a reference to an environment variable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordPart {
    Literal(String),
    Var(String),
}

/// A single logical token, e.g. `/tmp/$USER` is `[Literal("/tmp/"), Var("USER")]`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "WordRepr")]
pub struct Word(pub Vec<WordPart>);

// A bare string in a tree file is shorthand for a single literal fragment.
#[derive(Deserialize)]
#[serde(untagged)]
enum WordRepr {
    Text(String),
    Parts(Vec<WordPart>),
}

impl From<WordRepr> for Word {
    fn from(repr: WordRepr) -> Self {
        match repr {
            WordRepr::Text(s) => Word::literal(&s),
            WordRepr::Parts(parts) => Word(parts),
        }
    }
}

impl Word {
    pub fn literal(s: &str) -> Self {
        Word(vec![WordPart::Literal(s.to_string())])
    }

    #[cfg(test)]
    pub fn var(name: &str) -> Self {
        Word(vec![WordPart::Var(name.to_string())])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Text of a word made of exactly one literal fragment.
    pub fn as_literal(&self) -> Option<&str> {
        match self.0.as_slice() {
            [WordPart::Literal(s)] => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IoFlags {
    pub out_append: bool,
    pub err_append: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimpleCommand {
    pub verb: Word,
    #[serde(default)]
    pub params: Vec<Word>,
    #[serde(default, rename = "in")]
    pub input: Option<Word>,
    #[serde(default, rename = "out")]
    pub output: Option<Word>,
    #[serde(default, rename = "err")]
    pub error: Option<Word>,
    #[serde(default)]
    pub io: IoFlags,
}

// Builders for hand-written trees in tests; real trees come from the loader.
#[cfg(test)]
impl SimpleCommand {
    pub fn new(verb: Word) -> Self {
        Self { verb, ..Default::default() }
    }

    pub fn arg(mut self, word: Word) -> Self {
        self.params.push(word);
        self
    }

    pub fn stdin(mut self, word: Word) -> Self {
        self.input = Some(word);
        self
    }

    pub fn stdout(mut self, word: Word, append: bool) -> Self {
        self.output = Some(word);
        self.io.out_append = append;
        self
    }

    pub fn stderr(mut self, word: Word, append: bool) -> Self {
        self.error = Some(word);
        self.io.err_append = append;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    // "a ; b"
    Sequential,
    // "a & b"
    Parallel,
    // "a || b"
    CondNzero,
    // "a && b"
    CondZero,
    // "a | b"
    Pipe,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Sequential => ";",
            Operator::Parallel => "&",
            Operator::CondNzero => "||",
            Operator::CondZero => "&&",
            Operator::Pipe => "|",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Simple(SimpleCommand),
    Node {
        op: Operator,
        cmd1: Box<Command>,
        cmd2: Box<Command>,
    },
}

impl Command {
    #[cfg(test)]
    pub fn node(op: Operator, cmd1: Command, cmd2: Command) -> Self {
        Command::Node { op, cmd1: Box::new(cmd1), cmd2: Box::new(cmd2) }
    }

    /// Operator tag of this node; `None` for a leaf.
    pub fn op(&self) -> Option<Operator> {
        match self {
            Command::Simple(_) => None,
            Command::Node { op, .. } => Some(*op),
        }
    }

    /// Visits every leaf, left to right.
    pub fn leaves(&self) -> Vec<&SimpleCommand> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(cmd) = stack.pop() {
            match cmd {
                Command::Simple(s) => out.push(s),
                Command::Node { cmd1, cmd2, .. } => {
                    stack.push(cmd2);
                    stack.push(cmd1);
                }
            }
        }
        out
    }
}

impl From<SimpleCommand> for Command {
    fn from(s: SimpleCommand) -> Self {
        Command::Simple(s)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "''");
        }
        for part in &self.0 {
            match part {
                WordPart::Literal(s) => write!(f, "{}", shell_words::quote(s))?,
                WordPart::Var(name) => write!(f, "${{{}}}", name)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for SimpleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verb)?;
        for p in &self.params {
            write!(f, " {}", p)?;
        }
        if let Some(input) = &self.input {
            write!(f, " < {}", input)?;
        }
        match (&self.output, &self.error) {
            (Some(out), Some(err)) if out == err => write!(f, " &> {}", out)?,
            (out, err) => {
                if let Some(out) = out {
                    let sym = if self.io.out_append { ">>" } else { ">" };
                    write!(f, " {} {}", sym, out)?;
                }
                if let Some(err) = err {
                    let sym = if self.io.err_append { "2>>" } else { "2>" };
                    write!(f, " {} {}", sym, err)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Simple(s) => write!(f, "{}", s),
            Command::Node { op, cmd1, cmd2 } => {
                write_operand(f, cmd1)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, cmd2)
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, cmd: &Command) -> fmt::Result {
    match cmd {
        Command::Simple(_) => write!(f, "{}", cmd),
        Command::Node { .. } => write!(f, "({})", cmd),
    }
}
