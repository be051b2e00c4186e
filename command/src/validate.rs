//! Command tree validation.
//!
//! # Examples
//!
//! ```
//! use flagset_command::{LeafCommand, MultiCommand, Node, validate_tree};
//! use flagset_core::{CliArgs, Flagset};
//!
//! let ok = |_: CliArgs<()>, _: &mut dyn flagset_command::Output| Ok(0);
//! let tree: Node = MultiCommand::new("tool", "")
//!     .with_subcommand(LeafCommand::new("build", "", Flagset::new(), ok))
//!     .with_subcommand(LeafCommand::new("build", "", Flagset::new(), ok))
//!     .into();
//!
//! let errors = validate_tree(&tree);
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].to_string(), "duplicate subcommand in scope: tool build");
//! ```

use std::collections::HashSet;

use flagset_core::{DefinitionError, validate_flagset};

use crate::multi::Node;
use crate::router::is_help_token;

/// Validates a command tree and every leaf's flagset.
///
/// Stops at the first problem. Flagset problems are wrapped in
/// [`DefinitionError::InCommand`] with the leaf's command path.
pub fn validate_tree(root: &Node) -> Vec<DefinitionError> {
    let mut path = Vec::new();
    validate_node(root, &mut path)
}

fn validate_node(node: &Node, path: &mut Vec<String>) -> Vec<DefinitionError> {
    let mut errors = Vec::new();
    let name = node.name();
    path.push(name.to_string());

    if let Some(err) = check_name(name, path) {
        errors.push(err);
        path.pop();
        return errors;
    }

    match node {
        Node::Leaf(leaf) => {
            if let Some(source) = validate_flagset(leaf.flagset()).into_iter().next() {
                errors.push(DefinitionError::InCommand {
                    path: path.join(" "),
                    source: Box::new(source),
                });
            }
        }
        Node::Multi(multi) => {
            let mut seen: HashSet<&str> = HashSet::new();
            for sub in multi.subcommands() {
                if !sub.name().is_empty() && !seen.insert(sub.name()) {
                    let duplicate = format!("{} {}", path.join(" "), sub.name());
                    errors.push(DefinitionError::DuplicateSubcommand(duplicate));
                    break;
                }

                errors.extend(validate_node(sub, path));
                if !errors.is_empty() {
                    break;
                }
            }
        }
    }

    path.pop();
    errors
}

fn check_name(name: &str, path: &[String]) -> Option<DefinitionError> {
    if name.trim().is_empty() {
        return Some(DefinitionError::EmptyCommandName(display_path(path)));
    }
    if is_help_token(name) || name.starts_with('-') || name.chars().any(char::is_whitespace) {
        return Some(DefinitionError::InvalidSubcommandName(display_path(path)));
    }
    None
}

fn display_path(path: &[String]) -> String {
    path.iter()
        .map(|segment| match segment.trim() {
            "" => "<empty>",
            _ => segment.as_str(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use flagset_core::{BooleanFlag, CliArgs, Flag, Flagset, StringFlag};

    use super::*;
    use crate::command::LeafCommand;
    use crate::multi::MultiCommand;

    fn leaf(name: &str, flagset: Flagset) -> LeafCommand<()> {
        LeafCommand::new(name, "", flagset, |_: CliArgs<()>, _| Ok(0))
    }

    #[test]
    fn test_valid_tree() {
        let build = Flagset::new().with_flag(Flag::required("release", "", BooleanFlag));
        let cache = MultiCommand::new("cache", "").with_subcommand(leaf("clear", Flagset::new()));
        let tree: Node = MultiCommand::new("tool", "")
            .with_subcommand(leaf("build", build))
            .with_subcommand(cache)
            .into();

        assert!(validate_tree(&tree).is_empty());
    }

    #[test]
    fn test_leaf_flagset_error_carries_path() {
        let bad = Flagset::new().with_flag(Flag::optional("help", "", StringFlag));
        let tree: Node = MultiCommand::new("tool", "")
            .with_subcommand(MultiCommand::new("cache", "").with_subcommand(leaf("clear", bad)))
            .into();

        let errors = validate_tree(&tree);
        assert_eq!(
            errors,
            vec![DefinitionError::InCommand {
                path: "tool cache clear".to_string(),
                source: Box::new(DefinitionError::ReservedFlagName("help".to_string())),
            }]
        );
    }

    #[test]
    fn test_help_is_not_a_subcommand_name() {
        let tree: Node = MultiCommand::new("tool", "")
            .with_subcommand(leaf("help", Flagset::new()))
            .into();
        assert_eq!(
            validate_tree(&tree),
            vec![DefinitionError::InvalidSubcommandName("tool help".to_string())]
        );
    }

    #[test]
    fn test_flag_like_and_empty_names() {
        let dashed: Node = MultiCommand::new("tool", "")
            .with_subcommand(leaf("--build", Flagset::new()))
            .into();
        assert_eq!(
            validate_tree(&dashed),
            vec![DefinitionError::InvalidSubcommandName("tool --build".to_string())]
        );

        let empty: Node = MultiCommand::new("tool", "")
            .with_subcommand(leaf(" ", Flagset::new()))
            .into();
        assert_eq!(
            validate_tree(&empty),
            vec![DefinitionError::EmptyCommandName("tool <empty>".to_string())]
        );
    }
}
