//! Presentation helpers for agent records: names, badges, relative times.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde_json::Value;

use super::AgentRecord;

/// An agent seen within this many minutes counts as online.
pub const ONLINE_WINDOW_MINUTES: i64 = 5;

const NO_DESCRIPTION: &str = "No description available";

impl AgentRecord {
    /// Whether the agent shows the verified badge.
    ///
    /// Only a non-zero registry id is checked; this is not a cryptographic proof.
    pub fn is_verified(&self) -> bool {
        self.agent_id > 0
    }

    /// `card.name`, or the first label of the domain.
    pub fn display_name(&self) -> &str {
        match self.card.get("name").and_then(Value::as_str) {
            Some(name) if !name.is_empty() => name,
            _ => self.domain.split('.').next().unwrap_or_default(),
        }
    }

    /// `card.description`, or a placeholder.
    pub fn description(&self) -> &str {
        match self.card.get("description").and_then(Value::as_str) {
            Some(desc) if !desc.is_empty() => desc,
            _ => NO_DESCRIPTION,
        }
    }

    /// Skill names in card order.
    pub fn skill_names(&self) -> Vec<&str> {
        self.skills.iter().map(skill_name).collect()
    }
}

/// Human name for a known chain id, `Chain {id}` otherwise.
pub fn chain_name(chain_id: &str) -> String {
    let name = match chain_id {
        "1" => "Ethereum",
        "11155111" => "Sepolia",
        "8453" => "Base",
        "84532" => "Base Sepolia",
        "42161" => "Arbitrum",
        "421614" => "Arbitrum Sepolia",
        "10" => "Optimism",
        "11155420" => "Optimism Sepolia",
        other => return format!("Chain {}", other),
    };
    name.to_string()
}

/// Shortens `0x1234...abcd`, keeping `chars + 2` leading and `chars` trailing characters.
pub fn truncate_address(address: &str, chars: usize) -> String {
    let total = address.chars().count();
    if total <= chars * 2 + 2 {
        return address.to_string();
    }
    let head: String = address.chars().take(chars + 2).collect();
    let tail: String = address.chars().skip(total - chars).collect();
    format!("{}...{}", head, tail)
}

/// "just now", "5m ago", "3h ago", "2d ago", then a short calendar date.
pub fn format_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - ts).num_seconds();
    let mins = secs.div_euclid(60);
    let hours = mins.div_euclid(60);
    let days = hours.div_euclid(24);

    if secs < 60 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{}m ago", mins)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else if ts.year() != now.year() {
        ts.format("%b %-d, %Y").to_string()
    } else {
        ts.format("%b %-d").to_string()
    }
}

/// Seen within [`ONLINE_WINDOW_MINUTES`] of `now`.
pub fn is_online(last_seen: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - last_seen < Duration::minutes(ONLINE_WINDOW_MINUTES)
}

/// Badge color for a trust model tag.
pub fn trust_model_color(model: &str) -> &'static str {
    match model.to_lowercase().as_str() {
        "feedback" => "orange",
        "reputation" => "cyan",
        "economic" => "blue",
        "hybrid" => "purple",
        _ => "gray",
    }
}

/// `name`, then `id`, then "Unknown Skill".
pub fn skill_name(skill: &Value) -> &str {
    ["name", "id"]
        .iter()
        .filter_map(|key| skill.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or("Unknown Skill")
}

/// Tags of a card skill; a bare string counts as one tag.
pub fn skill_tags(skill: &Value) -> Vec<String> {
    match skill.get("tags") {
        Some(Value::Array(tags)) => tags
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(tag)) => vec![tag.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(agent_id: u64, card: Value) -> AgentRecord {
        serde_json::from_value(json!({
            "chainId": "11155111",
            "agentId": agent_id,
            "domain": "weather.agents.example",
            "card": card,
            "lastSeenAt": "2025-06-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn verified_only_when_agent_id_positive() {
        assert!(record(1, json!({})).is_verified());
        assert!(!record(0, json!({})).is_verified());
    }

    #[test]
    fn display_name_falls_back_to_domain_label() {
        assert_eq!(record(1, json!({"name": "Weather Bot"})).display_name(), "Weather Bot");
        assert_eq!(record(1, json!({"name": ""})).display_name(), "weather");
        assert_eq!(record(1, json!({})).description(), "No description available");
    }

    #[test]
    fn chain_names() {
        assert_eq!(chain_name("11155111"), "Sepolia");
        assert_eq!(chain_name("84532"), "Base Sepolia");
        assert_eq!(chain_name("999"), "Chain 999");
    }

    #[test]
    fn truncates_long_addresses_only() {
        assert_eq!(
            truncate_address("0x127C86a24F46033E77C347258354ee4C739b139C", 4),
            "0x127C...139C"
        );
        assert_eq!(truncate_address("0x1234", 4), "0x1234");
        assert_eq!(truncate_address("", 4), "");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap();
        assert_eq!(format_relative(now - Duration::seconds(30), now), "just now");
        assert_eq!(format_relative(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(format_relative(now - Duration::hours(3), now), "3h ago");
        assert_eq!(format_relative(now - Duration::days(2), now), "2d ago");
        assert_eq!(
            format_relative(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(), now),
            "Jun 1"
        );
        assert_eq!(
            format_relative(Utc.with_ymd_and_hms(2024, 12, 25, 0, 0, 0).unwrap(), now),
            "Dec 25, 2024"
        );
    }

    #[test]
    fn online_window_is_five_minutes() {
        let now = Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap();
        assert!(is_online(now - Duration::minutes(4), now));
        assert!(!is_online(now - Duration::minutes(5), now));
    }

    #[test]
    fn trust_model_colors_ignore_case() {
        assert_eq!(trust_model_color("Feedback"), "orange");
        assert_eq!(trust_model_color("hybrid"), "purple");
        assert_eq!(trust_model_color("tee"), "gray");
    }

    #[test]
    fn skill_name_and_tags() {
        assert_eq!(skill_name(&json!({"name": "forecast", "id": "f1"})), "forecast");
        assert_eq!(skill_name(&json!({"id": "f1"})), "f1");
        assert_eq!(skill_name(&json!(null)), "Unknown Skill");
        assert_eq!(skill_tags(&json!({"tags": ["a", "b"]})), vec!["a", "b"]);
        assert_eq!(skill_tags(&json!({"tags": "solo"})), vec!["solo"]);
        assert!(skill_tags(&json!({"tags": 3})).is_empty());
    }
}
