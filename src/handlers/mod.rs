pub mod check;
pub mod run;

use crate::engine::ast::Command;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Reads a serialized command tree. `.toml` files are TOML, anything else JSON.
pub fn load_tree(path: &Path) -> Result<Command> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tree file: {}", path.display()))?;
    let tree = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(anyhow::Error::from),
        _ => parse_json(&content),
    };
    tree.with_context(|| format!("Invalid command tree in {}", path.display()))
}

/// Trees nest two JSON objects per node, so serde_json's default nesting
/// limit would cap them well below `engine.max_depth`. The stack grows on
/// demand instead.
fn parse_json(content: &str) -> Result<Command> {
    let mut json = serde_json::Deserializer::from_str(content);
    json.disable_recursion_limit();
    let tree = Command::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ast::Operator;

    #[test]
    fn test_load_json_and_toml() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("tree.json");
        fs::write(&json, r#"{"simple": {"verb": "pwd"}}"#).unwrap();
        assert_eq!(load_tree(&json).unwrap().op(), None);

        let toml_path = dir.path().join("tree.toml");
        fs::write(
            &toml_path,
            "[node]\nop = \"sequential\"\n[node.cmd1.simple]\nverb = \"a\"\n[node.cmd2.simple]\nverb = \"b\"\n",
        )
        .unwrap();
        assert_eq!(load_tree(&toml_path).unwrap().op(), Some(Operator::Sequential));
    }

    #[test]
    fn test_load_invalid_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"node": {"op": "xor"}}"#).unwrap();
        let err = load_tree(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid command tree"));
    }

    #[test]
    fn test_load_deep_sequential_chain() {
        let depth = 300;
        let mut json = String::new();
        for _ in 0..depth {
            json.push_str(r#"{"node":{"op":"sequential","cmd1":{"simple":{"verb":"true"}},"cmd2":"#);
        }
        json.push_str(r#"{"simple":{"verb":"true"}}"#);
        json.push_str(&"}}".repeat(depth));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.json");
        fs::write(&path, json).unwrap();
        let tree = load_tree(&path).unwrap();
        assert_eq!(tree.op(), Some(Operator::Sequential));
        assert_eq!(tree.leaves().len(), depth + 1);
    }

    #[test]
    fn test_load_rejects_trailing_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trailing.json");
        fs::write(&path, r#"{"simple": {"verb": "pwd"}} {"simple": {"verb": "ls"}}"#).unwrap();
        assert!(load_tree(&path).is_err());
    }
}
