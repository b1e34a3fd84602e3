//! Backend response normalization
//!
//! The panel backend has returned several shapes over time. Everything
//! that knows about those shapes lives here; the rest of the crate only
//! sees [`PanelResponse`].
//!
//! Accepted input:
//!
//! | Shape | Example |
//! |-------|---------|
//! | Top-level list | `{ "discussion": [...], "consensus": {...}, "cached": false }` |
//! | Wrapped | `{ "data": { "discussion": [...] } }` |
//! | Nested list | `{ "discussion": { "messages": [...] } }` |
//! | Bare array | `[ {...}, {...} ]` |
//!
//! Within an opinion the contributor may be named by `model`,
//! `panelistName` or `panelist`, and the body by `message` or `content`.

use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use panel_application::{GatewayError, PanelResponse};
use panel_domain::{
    ConsensusSummary, MarketData, MarketEvent, MarketSnapshot, OpinionType, PanelOpinion,
    Persona, Sentiment,
};
use serde_json::{Map, Value};
use tracing::debug;

const NAME_KEYS: [&str; 3] = ["model", "panelistName", "panelist"];
const BODY_KEYS: [&str; 3] = ["message", "content", "text"];
const ERROR_KEYS: [&str; 3] = ["message", "error", "detail"];

/// Convert a decoded response body into a [`PanelResponse`].
///
/// `now` stands in for opinions that carry no usable timestamp.
pub fn normalize_panel_response(
    body: Value,
    now: DateTime<Utc>,
) -> Result<PanelResponse, GatewayError> {
    let root = payload_root(&body);
    let items = discussion_items(root).ok_or_else(|| {
        GatewayError::InvalidResponse("response contains no discussion list".to_string())
    })?;

    let discussion = items
        .iter()
        .map(|item| normalize_opinion(item, now))
        .collect::<Result<Vec<_>, _>>()?;

    let object = root.as_object();
    let field = |key: &str| object.and_then(|o| o.get(key));

    Ok(PanelResponse {
        discussion,
        consensus: field("consensus").and_then(normalize_consensus),
        market_data: field("marketData").and_then(normalize_market_data),
        economic_calendar: field("economicCalendar")
            .map(normalize_calendar)
            .unwrap_or_default(),
        cached: field("cached").and_then(Value::as_bool).unwrap_or(false),
    })
}

/// Pull a user-facing message out of an error response body
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    ERROR_KEYS.iter().find_map(|key| match object.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(inner) => inner
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}

fn payload_root(body: &Value) -> &Value {
    match body.get("data") {
        Some(data) if data.is_object() && data.get("discussion").is_some() => data,
        _ => body,
    }
}

fn discussion_items(root: &Value) -> Option<&Vec<Value>> {
    if let Value::Array(items) = root {
        return Some(items);
    }
    match root.get("discussion")? {
        Value::Array(items) => Some(items),
        Value::Object(wrapper) => ["messages", "discussion", "opinions"]
            .iter()
            .find_map(|key| wrapper.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

fn normalize_opinion(item: &Value, now: DateTime<Utc>) -> Result<PanelOpinion, GatewayError> {
    let object = item.as_object().ok_or_else(|| {
        GatewayError::InvalidResponse(format!("discussion entry is not an object: {}", item))
    })?;

    let model = first_string(object, &NAME_KEYS).unwrap_or_else(|| "Unknown".to_string());
    let persona = Persona::resolve(&model);
    let styled = |key: &str, fallback: fn(&Persona) -> &'static str| {
        string_field(object, key)
            .or_else(|| persona.as_ref().map(|p| fallback(p).to_string()))
            .unwrap_or_default()
    };

    Ok(PanelOpinion {
        role: styled("role", Persona::role),
        icon: styled("icon", Persona::icon),
        color: styled("color", Persona::color),
        message: first_string(object, &BODY_KEYS).unwrap_or_default(),
        timestamp: object
            .get("timestamp")
            .and_then(parse_timestamp)
            .unwrap_or(now)
            .trunc_subsecs(3),
        opinion_type: string_field(object, "type")
            .and_then(|t| t.parse::<OpinionType>().ok())
            .unwrap_or_default(),
        agrees_with_points: string_list(object, "agreesWithPoints"),
        disagrees_with_points: string_list(object, "disagreesWithPoints"),
        new_insights: string_list(object, "newInsights"),
        sentiment: string_field(object, "sentiment").and_then(|s| s.parse::<Sentiment>().ok()),
        confidence: object
            .get("confidence")
            .and_then(Value::as_f64)
            .map(|c| c.clamp(0.0, 1.0)),
        key_points: string_list(object, "keyPoints"),
        model,
    })
}

fn normalize_consensus(value: &Value) -> Option<ConsensusSummary> {
    let object = value.as_object()?;
    let recommendation = string_field(object, "recommendation")?;
    let confidence = object
        .get("confidence")
        .and_then(Value::as_f64)
        .map_or(0, |c| c.clamp(0.0, 100.0).round() as u8);
    let risk_level = string_field(object, "riskLevel")
        .or_else(|| string_field(object, "risk_level"))
        .unwrap_or_default();

    Some(
        ConsensusSummary::new(recommendation, confidence)
            .with_timeframe(string_field(object, "timeframe").unwrap_or_default())
            .with_risk_level(risk_level)
            .with_key_points(string_list(object, "keyPoints").unwrap_or_default()),
    )
}

fn normalize_market_data(value: &Value) -> Option<MarketData> {
    let object = value.as_object()?;
    let data: MarketData = object
        .iter()
        .filter_map(|(ticker, snapshot)| {
            match serde_json::from_value::<MarketSnapshot>(snapshot.clone()) {
                Ok(s) => Some((ticker.clone(), s)),
                Err(e) => {
                    debug!("Skipping market data for {}: {}", ticker, e);
                    None
                }
            }
        })
        .collect();
    (!data.is_empty()).then_some(data)
}

fn normalize_calendar(value: &Value) -> Vec<MarketEvent> {
    value
        .as_array()
        .map(|events| {
            events
                .iter()
                .filter_map(|e| serde_json::from_value(e.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_string(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| string_field(object, key))
}

fn string_list(object: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items = object.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}
