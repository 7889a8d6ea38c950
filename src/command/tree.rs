//! Command tree and usage rendering.
//!
//! A chain of single-child nodes collapses onto one line; a node with several
//! children ends its line and each child starts an indented line of its own.

use owo_colors::OwoColorize;

const INDENT: &str = "   ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Literal,
    Argument,
}

/// One node of a command grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    label: String,
    kind: NodeKind,
    executable: bool,
    children: Vec<CommandNode>,
}

impl CommandNode {
    /// A fixed keyword.
    pub fn literal(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: NodeKind::Literal,
            executable: false,
            children: Vec::new(),
        }
    }

    /// A named argument slot.
    pub fn argument(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: NodeKind::Argument,
            executable: false,
            children: Vec::new(),
        }
    }

    /// Mark the command ending at this node as runnable.
    pub fn executes(mut self) -> Self {
        self.executable = true;
        self
    }

    pub fn then(mut self, child: CommandNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_executable(&self) -> bool {
        self.executable
    }

    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    /// `name` for literals, `<name>` for arguments.
    pub fn usage(&self) -> String {
        match self.kind {
            NodeKind::Literal => self.label.clone(),
            NodeKind::Argument => format!("<{}>", self.label),
        }
    }
}

/// How node labels are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Plain,
    /// Executable nodes green, the rest white.
    Ansi,
}

impl Palette {
    fn paint(self, node: &CommandNode) -> String {
        let usage = node.usage();
        match self {
            Palette::Plain => usage,
            Palette::Ansi if node.is_executable() => usage.green().to_string(),
            Palette::Ansi => usage.white().to_string(),
        }
    }
}

/// Render the subtree below `root` as usage lines, without colour.
pub fn render(root: &CommandNode) -> Vec<String> {
    render_with(root, Palette::Plain)
}

pub fn render_with(root: &CommandNode, palette: Palette) -> Vec<String> {
    let mut lines = Vec::new();
    for child in root.children() {
        render_chain(child, 0, palette, &mut lines);
    }
    lines
}

/// Children of a collapsed chain stay on the chain's level. Only the children
/// of a node that branches right away move one level in.
fn render_chain(node: &CommandNode, depth: usize, palette: Palette, lines: &mut Vec<String>) {
    let mut segments = vec![palette.paint(node)];
    let mut tail = node;
    while let [only] = tail.children() {
        segments.push(palette.paint(only));
        tail = only;
    }
    let collapsed = segments.len() > 1;
    lines.push(format!("{}{}", INDENT.repeat(depth), segments.join(" ")));

    let child_depth = if collapsed { depth } else { depth + 1 };
    for child in tail.children() {
        render_chain(child, child_depth, palette, lines);
    }
}

/// Grammar of the `pregen` command.
pub fn pregen_tree() -> CommandNode {
    CommandNode::literal("pregen")
        .then(
            CommandNode::literal("generate").then(
                CommandNode::argument("world").then(
                    CommandNode::argument("minX").then(
                        CommandNode::argument("minZ").then(
                            CommandNode::argument("maxX")
                                .then(CommandNode::argument("maxZ").executes()),
                        ),
                    ),
                ),
            ),
        )
        .then(CommandNode::literal("listTasks").executes())
        .then(CommandNode::literal("cancel").then(CommandNode::argument("task").executes()))
}
