//! Text and JSON output for search pages and agent details.

use anyhow::Result;
use chrono::{DateTime, Utc};
use praxis_sdk::agent::{chain_name, format_relative, is_online, skill_tags, truncate_address};
use praxis_sdk::{AgentRecord, SearchPage};
use serde_json::{json, Value};

/// One line per agent plus the continuation cursor, if any.
pub fn format_page_lines(page: &SearchPage, now: DateTime<Utc>) -> Vec<String> {
    let mut lines: Vec<String> = page
        .items
        .iter()
        .map(|a| format_summary_line(a, now))
        .collect();
    if page.items.is_empty() {
        lines.push("No agents found".to_string());
    }
    if let Some(cursor) = &page.next_cursor {
        lines.push(format!("next cursor: {}", cursor));
    }
    lines
}

fn format_summary_line(agent: &AgentRecord, now: DateTime<Utc>) -> String {
    let badge = if agent.is_verified() { " ✓" } else { "" };
    let seen = if is_online(agent.last_seen_at, now) {
        "online".to_string()
    } else {
        format_relative(agent.last_seen_at, now)
    };
    let trust = if agent.trust_models.is_empty() {
        String::new()
    } else {
        format!(" [{}]", agent.trust_models.join(", "))
    };
    format!(
        "{}/{} {}{} ({}) {} · {}{}",
        agent.chain_id,
        agent.agent_id,
        agent.display_name(),
        badge,
        agent.domain,
        chain_name(&agent.chain_id),
        seen,
        trust
    )
}

/// Detail view of one agent.
pub fn format_agent_lines(agent: &AgentRecord, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{}{}",
            agent.display_name(),
            if agent.is_verified() { " (verified)" } else { "" }
        ),
        format!("  {}", agent.description()),
        format!("  Domain: {}", agent.domain),
        format!("  Network: {} ({})", chain_name(&agent.chain_id), agent.chain_id),
        format!("  Agent ID: {}", agent.agent_id),
        format!("  Address: {}", truncate_address(&agent.address_caip10, 6)),
    ];
    if let Some(registry) = &agent.registry_address {
        lines.push(format!("  Registry: {}", truncate_address(registry, 4)));
    }
    if let Some(score) = agent.score_average {
        lines.push(format!("  Score: {:.2}", score));
    }
    lines.push(format!(
        "  Feedbacks: {}  Validations: {}",
        agent.feedbacks_count, agent.validations_count
    ));
    lines.push(format!(
        "  Last seen: {}",
        if is_online(agent.last_seen_at, now) {
            "online".to_string()
        } else {
            format_relative(agent.last_seen_at, now)
        }
    ));
    if !agent.trust_models.is_empty() {
        lines.push(format!("  Trust models: {}", agent.trust_models.join(", ")));
    }
    for (skill, name) in agent.skills.iter().zip(agent.skill_names()) {
        let tags = skill_tags(skill);
        if tags.is_empty() {
            lines.push(format!("  Skill: {}", name));
        } else {
            lines.push(format!("  Skill: {} [{}]", name, tags.join(", ")));
        }
    }
    lines
}

pub fn print_page(page: &SearchPage, now: DateTime<Utc>) {
    for line in format_page_lines(page, now) {
        println!("{}", line);
    }
}

pub fn print_agent(agent: &AgentRecord, now: DateTime<Utc>) {
    for line in format_agent_lines(agent, now) {
        println!("{}", line);
    }
}

/// `{items, nextCursor}` in wire shape.
pub fn page_json(page: &SearchPage) -> Value {
    json!({
        "items": page.items,
        "nextCursor": page.next_cursor,
    })
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
