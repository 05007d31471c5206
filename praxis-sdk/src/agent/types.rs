//! Directory API types (`/agents`, `/agents/{chainId}/{agentId}`, `/admin/refresh`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// An indexed agent identity as returned by the explorer API.
///
/// Produced by the server; the client never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    /// EVM chain id as a decimal string (e.g. `"11155111"`).
    pub chain_id: String,
    /// Registry-assigned id. `0` means the agent has no on-chain id yet.
    pub agent_id: u64,
    /// Identity registry contract the agent was indexed from.
    #[serde(
        default,
        rename = "registryAddr",
        skip_serializing_if = "Option::is_none"
    )]
    pub registry_address: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
    /// CAIP-10 account id, e.g. `eip155:1:0xabc...`.
    #[serde(
        default,
        rename = "addressCaip10",
        deserialize_with = "null_as_default"
    )]
    pub address_caip10: String,
    /// Agent card JSON (name, description, skills, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub card: Map<String, Value>,
    /// Trust model tags such as `feedback` or `reputation`. Distinct, in server order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub trust_models: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capabilities: Map<String, Value>,
    #[serde(
        default,
        rename = "scoreAvg",
        skip_serializing_if = "Option::is_none"
    )]
    pub score_average: Option<f64>,
    #[serde(
        default,
        rename = "validationsCnt",
        deserialize_with = "null_as_default"
    )]
    pub validations_count: u64,
    #[serde(
        default,
        rename = "feedbacksCnt",
        deserialize_with = "null_as_default"
    )]
    pub feedbacks_count: u64,
    pub last_seen_at: DateTime<Utc>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Filters and pagination for `GET /agents`.
///
/// `cursor` is the opaque `nextCursor` from a previous page; forward it
/// unchanged, never build or parse one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text query (`q`).
    pub text: Option<String>,
    pub network: Option<String>,
    pub capability: Option<String>,
    pub skill: Option<String>,
    pub tag: Option<String>,
    pub trust_model: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    /// Returns an empty query (first page, server default limit).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    pub fn capability(mut self, capability: impl Into<String>) -> Self {
        self.capability = Some(capability.into());
        self
    }

    pub fn skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn trust_model(mut self, trust_model: impl Into<String>) -> Self {
        self.trust_model = Some(trust_model.into());
        self
    }

    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns a copy of this query continuing at `cursor`.
    pub fn with_cursor(&self, cursor: Option<String>) -> Self {
        Self {
            cursor,
            ..self.clone()
        }
    }

    /// Query string pairs for `GET /agents`.
    ///
    /// Only present, non-empty values are included, in a fixed order.
    /// A `limit` of zero counts as absent.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let strings = [
            ("q", &self.text),
            ("network", &self.network),
            ("capability", &self.capability),
            ("skill", &self.skill),
            ("tag", &self.tag),
            ("trustModel", &self.trust_model),
            ("cursor", &self.cursor),
        ];
        let mut pairs: Vec<(&'static str, String)> = strings
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| (key, v.to_string()))
            })
            .collect();
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub items: Vec<AgentRecord>,
    /// Continuation token; `None` means end of results.
    pub next_cursor: Option<String>,
}

impl SearchPage {
    /// Whether another page can be requested with `next_cursor`.
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Request body for `POST /admin/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub chain_id: String,
    pub domain: String,
    pub agent_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_addr: Option<String>,
}

impl RefreshRequest {
    pub fn new(chain_id: impl Into<String>, domain: impl Into<String>, agent_id: u64) -> Self {
        Self {
            chain_id: chain_id.into(),
            domain: domain.into(),
            agent_id,
            registry_addr: None,
        }
    }

    pub fn registry_addr(mut self, registry_addr: impl Into<String>) -> Self {
        self.registry_addr = Some(registry_addr.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_string_fields_are_left_out_of_query() {
        let q = SearchQuery {
            text: Some(String::new()),
            network: Some(String::new()),
            capability: Some(String::new()),
            skill: Some(String::new()),
            tag: Some(String::new()),
            trust_model: Some(String::new()),
            cursor: Some(String::new()),
            limit: None,
        };
        assert!(q.to_query_pairs().is_empty());
    }

    #[test]
    fn query_pairs_follow_fixed_order_and_limit_is_decimal() {
        let q = SearchQuery::new()
            .limit(25)
            .cursor("opaque==")
            .trust_model("feedback")
            .text("weather")
            .network("sepolia");
        assert_eq!(
            q.to_query_pairs(),
            vec![
                ("q", "weather".to_string()),
                ("network", "sepolia".to_string()),
                ("trustModel", "feedback".to_string()),
                ("cursor", "opaque==".to_string()),
                ("limit", "25".to_string()),
            ]
        );
    }

    #[test]
    fn zero_limit_is_omitted() {
        let q = SearchQuery::new().limit(0);
        assert!(q.to_query_pairs().is_empty());
    }

    #[test]
    fn with_cursor_keeps_filters() {
        let q = SearchQuery::new().skill("translate").cursor("a");
        let next = q.with_cursor(Some("b".into()));
        assert_eq!(next.skill.as_deref(), Some("translate"));
        assert_eq!(next.cursor.as_deref(), Some("b"));
    }

    #[test]
    fn agent_record_decodes_wire_names_and_null_collections() {
        let v = json!({
            "chainId": "11155111",
            "agentId": 7,
            "registryAddr": "0x127C86a24F46033E77C347258354ee4C739b139C",
            "domain": "weather.example.com",
            "addressCaip10": "eip155:11155111:0xabc",
            "card": null,
            "trustModels": ["feedback"],
            "skills": null,
            "capabilities": {"streaming": true},
            "scoreAvg": 4.5,
            "validationsCnt": 2,
            "feedbacksCnt": 9,
            "lastSeenAt": "2025-09-01T12:00:00Z"
        });
        let rec: AgentRecord = serde_json::from_value(v).unwrap();
        assert_eq!(rec.agent_id, 7);
        assert!(rec.card.is_empty());
        assert!(rec.skills.is_empty());
        assert_eq!(rec.score_average, Some(4.5));
        assert_eq!(rec.feedbacks_count, 9);
        assert_eq!(
            rec.registry_address.as_deref(),
            Some("0x127C86a24F46033E77C347258354ee4C739b139C")
        );
    }

    #[test]
    fn agent_record_treats_null_scalars_as_defaults() {
        let v = json!({
            "chainId": "1",
            "agentId": 5,
            "domain": null,
            "addressCaip10": null,
            "validationsCnt": null,
            "feedbacksCnt": null,
            "lastSeenAt": "2025-09-01T12:00:00Z"
        });
        let rec: AgentRecord = serde_json::from_value(v).unwrap();
        assert_eq!(rec.domain, "");
        assert_eq!(rec.address_caip10, "");
        assert_eq!(rec.validations_count, 0);
        assert_eq!(rec.feedbacks_count, 0);
    }

    #[test]
    fn refresh_request_omits_missing_registry() {
        let body = serde_json::to_value(RefreshRequest::new("1", "a.example", 3)).unwrap();
        assert_eq!(body, json!({"chainId": "1", "domain": "a.example", "agentId": 3}));

        let body = serde_json::to_value(RefreshRequest::new("1", "a.example", 3).registry_addr("0x1"))
            .unwrap();
        assert_eq!(body["registryAddr"], "0x1");
    }
}
