use crate::engine::ast::SimpleCommand;
use crate::engine::commands::assign::Assignment;
use crate::engine::context::ShellContext;
use crate::engine::expand::expand;
use crate::handlers::load_tree;
use anyhow::Result;
use colored::*;
use std::path::Path;

pub fn handle_check(tree_path: &Path) -> Result<i32> {
    let tree = load_tree(tree_path)?;
    let ctx = ShellContext::new();

    println!("{} {}", "▶".cyan(), tree);

    let mut problems = 0;
    for leaf in tree.leaves() {
        if !check_leaf(leaf, &ctx) {
            problems += 1;
        }
    }

    if problems == 0 {
        println!("{} all verbs resolve", "✔".green());
        Ok(0)
    } else {
        println!("{} {} problem(s) found", "⚠️".yellow(), problems);
        Ok(1)
    }
}

fn check_leaf(leaf: &SimpleCommand, ctx: &ShellContext) -> bool {
    if leaf.verb.is_empty() {
        return true;
    }
    match Assignment::parse(&leaf.verb) {
        Ok(Some(_)) => return true,
        Ok(None) => {}
        Err(e) => {
            println!("  {} {}", "✘".red(), e);
            return false;
        }
    }

    if let Some(name) = leaf.verb.as_literal().filter(|v| ctx.is_builtin(v)) {
        println!("  {} {} (built-in)", "✔".green(), name.bold());
        return true;
    }
    let verb = expand(&leaf.verb);
    match which::which(&verb) {
        Ok(path) => {
            println!("  {} {} -> {}", "✔".green(), verb.bold(), path.display());
            true
        }
        Err(_) => {
            println!("  {} {} not found on PATH", "✘".red(), verb.bold());
            false
        }
    }
}
