//! Main chat loop orchestration.
//!
//! One `tokio::select!` over readline input and the idle-timer channel
//! drives the whole session: slash commands, streaming sends through the
//! session controller, suggestion display, and node inspection. This is
//! the single-threaded event loop the engine's concurrency model
//! assumes -- one send at a time, cooperative.

use std::io::Write;
use std::time::{Duration, Instant};

use console::style;
use tracing::debug;

use mnema_core::recommend::IdleTimer;
use mnema_core::session::{SendOutcome, SessionController, TurnNotice};
use mnema_types::graph::{ActiveNode, NodeDetail};
use mnema_types::message::MessageRole;
use mnema_types::node_ref::{NodeRef, parse_node_refs};

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Run the interactive chat session.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let mut controller = SessionController::new(
        state.agent_transport(),
        state.graph_service(),
        state.suggest_service(),
        state.config.context_capacity,
    );
    controller.init().await;

    print_welcome_banner(&state.config.server_url, controller.window().len());

    let renderer = ChatRenderer::new();
    let (mut idle_timer, mut idle_rx) =
        IdleTimer::new(Duration::from_secs(state.config.idle_delay_secs));
    idle_timer.rearm();

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("failed to initialize input: {e}"))?;

    'session: loop {
        tokio::select! {
            event = chat_input.read_line() => match event {
                InputEvent::Eof => {
                    println!("\n  {}", style("Session ended.").dim());
                    break 'session;
                }
                InputEvent::Interrupted => {
                    idle_timer.rearm();
                    println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                }
                InputEvent::Message(text) => {
                    // Every submitted line is a qualifying user action.
                    idle_timer.rearm();
                    if text.is_empty() {
                        continue;
                    }

                    if let Some(command) = commands::parse(&text) {
                        match command {
                            ChatCommand::Help => commands::print_help(),
                            ChatCommand::Clear => {
                                controller.clear();
                                chat_input.clear();
                                println!("  {}", style("Conversation cleared.").dim());
                            }
                            ChatCommand::Exit => {
                                println!("\n  {}", style("Session ended.").dim());
                                break 'session;
                            }
                            ChatCommand::Nodes => print_active_nodes(&controller),
                            ChatCommand::Attach(id) => {
                                let detail = controller.resolve_node_reference(&id).await;
                                let node = ActiveNode::from(&detail.node);
                                println!(
                                    "  {} Attached {} to your next message.",
                                    style("+").green().bold(),
                                    style(&node.label).cyan()
                                );
                                controller.attach_node(node);
                            }
                            ChatCommand::Open(id) => {
                                let detail = controller.resolve_node_reference(&id).await;
                                print_node_detail(&renderer, &detail);
                            }
                            ChatCommand::Use(n) => match controller.take_suggestion(n - 1) {
                                Some(suggestion) => {
                                    println!(
                                        "  {} {}",
                                        style("You >").green().bold(),
                                        suggestion
                                    );
                                    send_turn(&mut controller, &renderer, &suggestion).await;
                                }
                                None => println!(
                                    "  {} No suggestion #{n}.",
                                    style("?").yellow().bold()
                                ),
                            },
                            ChatCommand::Unknown(name) => {
                                println!(
                                    "  {} Unknown command: /{name}. Type /help for available commands.",
                                    style("?").yellow().bold()
                                );
                            }
                        }
                        continue;
                    }

                    send_turn(&mut controller, &renderer, &text).await;
                }
            },
            Some(()) = idle_rx.recv() => {
                debug!("idle timer fired");
                if controller.idle_refresh().await {
                    print_suggestions(&controller);
                }
            }
        }
    }

    // The timer task must not outlive the session.
    idle_timer.cancel();
    Ok(())
}

/// Send one message and render the streamed response.
async fn send_turn(controller: &mut SessionController, renderer: &ChatRenderer, text: &str) {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let start = Instant::now();
    let mut streaming_open = false;

    let outcome = controller
        .send(text, |notice| match notice {
            TurnNotice::Delta(delta) => {
                if !streaming_open {
                    spinner.finish_and_clear();
                    streaming_open = true;
                    print!("\n  {} ", style("Mnema >").cyan().bold());
                    let _ = std::io::stdout().flush();
                }
                renderer.print_streaming_token(delta);
            }
            TurnNotice::ToolCall { name } => {
                spinner.finish_and_clear();
                if streaming_open {
                    println!();
                    streaming_open = false;
                }
                println!(
                    "  {} {}",
                    style("\u{2692}").dim(),
                    style(format!("calling {name}...")).dim()
                );
            }
            TurnNotice::ToolResult { name } => {
                spinner.finish_and_clear();
                if streaming_open {
                    println!();
                    streaming_open = false;
                }
                println!(
                    "  {} {}",
                    style("\u{2713}").green().dim(),
                    style(format!("{} returned", name.unwrap_or("tool"))).dim()
                );
            }
            TurnNotice::StreamError(message) => {
                spinner.finish_and_clear();
                if streaming_open {
                    println!();
                    streaming_open = false;
                }
                eprintln!("  {} {message}", style("!").red().bold());
            }
            TurnNotice::RoundComplete => {}
        })
        .await;

    spinner.finish_and_clear();
    if streaming_open {
        println!();
    }
    let elapsed = start.elapsed().as_millis() as u64;

    match outcome {
        SendOutcome::Completed => {
            let refs = last_answer_refs(controller);
            renderer.print_stats_footer(elapsed, refs.len());
            if !refs.is_empty() {
                for node_ref in &refs {
                    println!(
                        "    {} {} {}",
                        style("\u{21b3}").dim(),
                        style(&node_ref.label).cyan(),
                        style(format!("({})", node_ref.id)).dim()
                    );
                }
                println!("  {}", style("Open one with /open <id>.").dim());
            }
            print_suggestions(controller);
        }
        SendOutcome::Errored => {
            println!(
                "  {}",
                style("Type a message to retry, /exit to quit.").dim()
            );
        }
        SendOutcome::Ignored | SendOutcome::Rejected => {}
    }
    println!();
}

/// Entity references in the final answer of the last round.
fn last_answer_refs(controller: &SessionController) -> Vec<NodeRef> {
    controller
        .display()
        .iter()
        .rev()
        .find(|m| {
            m.message.role == MessageRole::Assistant
                && !m.message.has_tool_calls()
                && !m.message.text().is_empty()
        })
        .map(|m| parse_node_refs(m.message.text()))
        .unwrap_or_default()
}

fn print_suggestions(controller: &SessionController) {
    let panel = controller.suggestions();
    if panel.is_empty() || panel.is_collapsed() {
        return;
    }
    println!();
    println!("  {}", style("Suggested follow-ups").bold());
    for (i, suggestion) in panel.suggestions().iter().enumerate() {
        println!(
            "  {} {}",
            style(format!("[{}]", i + 1)).yellow(),
            suggestion.text
        );
    }
    println!("  {}", style("Send one with /use <n>.").dim());
}

fn print_active_nodes(controller: &SessionController) {
    println!();
    if controller.window().is_empty() {
        println!(
            "  {} No active nodes yet. Use /attach <id> or /open <id> to add some.",
            style("i").blue().bold()
        );
    } else {
        println!("  {}", style("Active nodes (most recent first)").bold());
        for node in controller.window().iter() {
            println!(
                "  {} {} {}",
                style("\u{00b7}").dim(),
                style(&node.label).cyan(),
                style(format!("({})", node.id)).dim()
            );
        }
    }
    if !controller.pending().is_empty() {
        println!();
        println!("  {}", style("Attached to next message").bold());
        for node in controller.pending().iter() {
            println!(
                "  {} {} {}",
                style("+").green(),
                style(&node.label).cyan(),
                style(format!("({})", node.id)).dim()
            );
        }
    }
    println!();
}

fn print_node_detail(renderer: &ChatRenderer, detail: &NodeDetail) {
    println!();
    println!(
        "  {} {}",
        style(&detail.node.label).cyan().bold(),
        style(format!("({}, {})", detail.node.id, detail.node.kind)).dim()
    );

    if let Some(desc) = detail.node.desc.as_deref() {
        if !desc.is_empty() {
            println!("  {}", style(desc).italic());
        }
    }

    if let Some(content) = detail.full_content.as_deref() {
        if !content.is_empty() {
            const PREVIEW_LINES: usize = 30;
            let preview: Vec<&str> = content.lines().take(PREVIEW_LINES).collect();
            println!();
            print!("{}", renderer.render_final(&preview.join("\n")));
            if content.lines().count() > PREVIEW_LINES {
                println!("  {}", style("[truncated]").dim());
            }
        }
    }

    if !detail.recommendations.is_empty() {
        println!();
        println!("  {}", style("Related").bold());
        for node in &detail.recommendations {
            println!(
                "  {} {} {}",
                style("\u{00b7}").dim(),
                style(&node.label).cyan(),
                style(format!("({})", node.id)).dim()
            );
        }
    }
    println!();
}
