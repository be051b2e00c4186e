//! Command trees.

use crate::command::{Leaf, LeafCommand};
use flagset_core::FromFlags;

/// A node of a command tree.
pub enum Node {
    Leaf(Box<dyn Leaf>),
    Multi(MultiCommand),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Leaf(leaf) => leaf.name(),
            Node::Multi(multi) => multi.name(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Node::Leaf(leaf) => leaf.description(),
            Node::Multi(multi) => multi.description(),
        }
    }

    pub fn describe(&self) -> String {
        format!("{}: {}", self.name(), self.description())
    }

    pub fn help(&self, path: &[String]) -> String {
        match self {
            Node::Leaf(leaf) => leaf.help(path),
            Node::Multi(multi) => multi.help(path),
        }
    }
}

impl<V: FromFlags + 'static> From<LeafCommand<V>> for Node {
    fn from(leaf: LeafCommand<V>) -> Self {
        Node::Leaf(Box::new(leaf))
    }
}

impl From<MultiCommand> for Node {
    fn from(multi: MultiCommand) -> Self {
        Node::Multi(multi)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Leaf(leaf) => f.debug_tuple("Leaf").field(&leaf.name()).finish(),
            Node::Multi(multi) => f.debug_tuple("Multi").field(multi).finish(),
        }
    }
}

/// A named group of subcommands. Not runnable by itself.
///
/// # Examples
///
/// ```
/// use flagset_command::{LeafCommand, MultiCommand};
/// use flagset_core::{CliArgs, Flagset};
///
/// let build = LeafCommand::new("build", "compile", Flagset::new(), |_: CliArgs<()>, _| Ok(0));
/// let tool = MultiCommand::new("tool", "project helper").with_subcommand(build);
///
/// assert!(tool.find("build").is_some());
/// assert_eq!(
///     tool.help(&[]),
///     "tool: project helper\n\nSubcommands:\n  build: compile\n"
/// );
/// ```
#[derive(Debug)]
pub struct MultiCommand {
    name: String,
    description: String,
    subcommands: Vec<Node>,
}

impl MultiCommand {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            subcommands: Vec::new(),
        }
    }

    /// Adds a subcommand.
    pub fn with_subcommand(mut self, node: impl Into<Node>) -> Self {
        self.subcommands.push(node.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn subcommands(&self) -> &[Node] {
        &self.subcommands
    }

    /// Finds a subcommand by exact name. The first declared match wins.
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.subcommands.iter().find(|node| node.name() == name)
    }

    /// Subcommand names in sorted order.
    pub fn subcommand_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.subcommands.iter().map(Node::name).collect();
        names.sort_unstable();
        names
    }

    pub fn describe(&self) -> String {
        format!("{}: {}", self.name, self.description)
    }

    /// Description plus a sorted listing of subcommands.
    pub fn help(&self, path: &[String]) -> String {
        let title = if path.is_empty() {
            self.name.clone()
        } else {
            path.join(" ")
        };
        let mut subcommands: Vec<&Node> = self.subcommands.iter().collect();
        subcommands.sort_by(|a, b| a.name().cmp(b.name()));

        let mut out = format!("{title}: {}\n\nSubcommands:\n", self.description);
        for node in subcommands {
            out.push_str(&format!("  {}\n", node.describe()));
        }
        out
    }
}
