//! Slash command parsing for the chat loop.

use console::style;

/// Commands available inside a chat session.
#[derive(Debug, PartialEq, Eq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Reset the conversation (history, display, suggestions).
    Clear,
    /// End the session.
    Exit,
    /// Show the context window and pending attachments.
    Nodes,
    /// Attach a node to the next message.
    Attach(String),
    /// Open a node's detail.
    Open(String),
    /// Submit suggestion N (1-based).
    Use(usize),
    /// Anything else starting with '/'.
    Unknown(String),
}

/// Parse a slash command; returns None for ordinary chat input.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let rest = input.strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let command = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::to_string);

    Some(match (command.as_str(), arg) {
        ("help", _) => ChatCommand::Help,
        ("clear", _) => ChatCommand::Clear,
        ("exit" | "quit", _) => ChatCommand::Exit,
        ("nodes", _) => ChatCommand::Nodes,
        ("attach", Some(id)) => ChatCommand::Attach(id),
        ("open", Some(id)) => ChatCommand::Open(id),
        ("use", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => ChatCommand::Use(n),
            _ => ChatCommand::Unknown(format!("use {n}")),
        },
        (other, _) => ChatCommand::Unknown(other.to_string()),
    })
}

/// Print the command reference.
pub fn print_help() {
    println!();
    println!("  {}", style("Commands").bold());
    let rows = [
        ("/help", "show this help"),
        ("/nodes", "show active nodes and pending attachments"),
        ("/attach <id>", "attach a node to the next message"),
        ("/open <id>", "show a node's detail"),
        ("/use <n>", "send suggested prompt n"),
        ("/clear", "reset the conversation"),
        ("/exit", "end the session (also Ctrl+D)"),
    ];
    for (cmd, desc) in rows {
        println!(
            "  {}  {}",
            style(format!("{cmd:<14}")).yellow(),
            style(desc).dim()
        );
    }
    println!();
}
