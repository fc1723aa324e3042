//! Node tree formatting: JSON and indented outline output.

use std::fmt::Write;
use std::str::FromStr;

use hyperdoc_core::Node;

/// Output format for node trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Outline,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "outline" => Ok(Self::Outline),
            other => Err(format!("unknown output format '{other}': expected json or outline")),
        }
    }
}

/// Format a node tree in the specified output format.
#[must_use]
pub fn render(node: &Node, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => render_json(node),
        OutputFormat::Outline => render_outline(node),
    }
}

fn render_json(node: &Node) -> String {
    serde_json::to_string_pretty(node).unwrap_or_else(|_| "{}".to_string())
}

fn render_outline(node: &Node) -> String {
    if let Some(value) = node.value() {
        return value.to_string();
    }
    if node.children().is_empty() {
        return "(empty)".to_string();
    }

    let mut output = String::new();
    for child in node.children() {
        outline_node(&mut output, child, 0);
    }
    output.truncate(output.trim_end().len());
    output
}

fn outline_node(output: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);

    if node.is_link() {
        let action = node
            .action()
            .and_then(|a| a.symbol())
            .unwrap_or("read");
        let _ = writeln!(
            output,
            "{indent}@{} {action} {}{}",
            node.rel().join(" "),
            node.url().unwrap_or_default(),
            node.template().unwrap_or_default(),
        );
        return;
    }

    let label = node.name().unwrap_or("-");
    match node.value() {
        Some(value) => {
            let _ = writeln!(output, "{indent}{label} = {value}");
        }
        None => {
            let _ = writeln!(output, "{indent}{label}");
            for child in node.children() {
                outline_node(output, child, depth + 1);
            }
        }
    }
}
