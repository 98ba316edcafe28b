//! Graph entity listing command.

use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use mnema_types::graph::NodeKind;

use crate::state::AppState;

/// List knowledge-graph entities, newest first.
pub async fn list_nodes(state: &AppState, limit: usize, json: bool) -> Result<()> {
    let graph = state.graph_service();
    let overview = graph
        .overview()
        .await
        .map_err(|e| anyhow::anyhow!("could not fetch graph overview: {e}"))?;

    let mut nodes = overview.nodes;
    nodes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    nodes.truncate(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&nodes)?);
        return Ok(());
    }

    if nodes.is_empty() {
        println!();
        println!(
            "  {} The knowledge graph is empty. Ingest some documents first.",
            style("i").blue().bold()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Label").fg(Color::White),
        Cell::new("Id").fg(Color::White),
        Cell::new("Kind").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for node in &nodes {
        let kind_cell = match node.kind {
            NodeKind::Doc => Cell::new(format!(
                "doc{}",
                node.doc_type
                    .as_deref()
                    .map(|t| format!(" ({t})"))
                    .unwrap_or_default()
            ))
            .fg(Color::Green),
            NodeKind::Concept => Cell::new("concept").fg(Color::Magenta),
        };

        let created = match &node.created_at {
            Some(dt) => format_relative_time(dt),
            None => "unknown".to_string(),
        };

        let label = if node.label.chars().count() > 50 {
            let truncated: String = node.label.chars().take(47).collect();
            format!("{truncated}...")
        } else {
            node.label.clone()
        };

        table.add_row(vec![
            Cell::new(label).fg(Color::Cyan),
            Cell::new(&node.id),
            kind_cell,
            Cell::new(created).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} node{}",
        style(nodes.len()).bold(),
        if nodes.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Human-readable time since a timestamp (e.g., "2h ago").
fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let delta = Utc::now().signed_duration_since(*dt);
    if delta.num_days() >= 365 {
        format!("{}y ago", delta.num_days() / 365)
    } else if delta.num_days() >= 1 {
        format!("{}d ago", delta.num_days())
    } else if delta.num_hours() >= 1 {
        format!("{}h ago", delta.num_hours())
    } else if delta.num_minutes() >= 1 {
        format!("{}m ago", delta.num_minutes())
    } else {
        "just now".to_string()
    }
}
