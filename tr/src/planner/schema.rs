//! Output schema sent with every itinerary request
//!
//! Written in the provider's OpenAPI-subset dialect: upper-case type names
//! and explicit `required` lists.

use serde_json::{Value, json};

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn described_string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn activity() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "time": string(),
            "activity": string(),
            "location": string(),
            "description": string(),
            "estimatedCost": string(),
        },
        "required": ["time", "activity", "location", "description"],
    })
}

fn day_plan() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "day": { "type": "INTEGER" },
            "title": string(),
            "activities": { "type": "ARRAY", "items": activity() },
        },
        "required": ["day", "title", "activities"],
    })
}

/// Schema for [`crate::domain::ItineraryResponse`]
pub fn itinerary_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "tripTitle": described_string("A catchy title for the trip"),
            "destination": string(),
            "totalEstimatedCost": described_string("Total estimated trip cost for the whole party"),
            "itinerary": { "type": "ARRAY", "items": day_plan() },
            "travelTips": { "type": "ARRAY", "items": string() },
        },
        "required": ["tripTitle", "destination", "totalEstimatedCost", "itinerary", "travelTips"],
    })
}
