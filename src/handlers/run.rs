use crate::config::ForkshConfig;
use crate::engine::context::ShellContext;
use crate::engine::evaluate;
use crate::handlers::load_tree;
use anyhow::Result;
use log::info;
use std::path::Path;

pub fn handle_run(tree_path: &Path, config: &ForkshConfig) -> Result<i32> {
    let tree = load_tree(tree_path)?;
    let mut ctx = ShellContext::new();
    let status = evaluate(&tree, 0, None, &mut ctx, &config.engine);
    info!("{} exited with {}", tree_path.display(), status);
    Ok(status)
}
