//! WASM bindings for rendez-engine.
//!
//! Exposes recurrence expansion, the free-slot sweep, and ranked meeting
//! proposals to a JavaScript host via `wasm-bindgen` -- the engine's
//! embedding in a Node web backend. All complex values cross the boundary as
//! JSON strings using the engine's own camelCase wire shape.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p rendez-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/rendez-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/rendez_engine_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use rendez_engine::{BusyInterval, ScheduleRecord, Window};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers: parse JSON payloads from the JavaScript side
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset, e.g., "2023-04-05T12:00:00Z")
/// and naive local time (e.g., "2023-04-05T12:00:00"), which is interpreted
/// as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn parse_window(window_start: &str, window_end: &str) -> Result<Window, JsValue> {
    Ok(Window::new(
        parse_datetime(window_start)?,
        parse_datetime(window_end)?,
    ))
}

fn parse_busy_json(json: &str) -> Result<Vec<BusyInterval>, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid busy-interval JSON: {}", e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand one recurring schedule record over a query window.
///
/// `record_json` is a schedule record object in the engine's wire shape
/// (`{"id", "owner": {"kind", "id"}, "title", "content", "startDateTime",
/// "endDateTime", "recurrence": {...}}`). Returns a JSON array of occurrence
/// objects.
#[wasm_bindgen(js_name = "expandSchedule")]
pub fn expand_schedule(
    record_json: &str,
    window_start: &str,
    window_end: &str,
) -> Result<String, JsValue> {
    let record: ScheduleRecord = serde_json::from_str(record_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid record JSON: {}", e)))?;
    let window = parse_window(window_start, window_end)?;

    let occurrences = rendez_engine::expand_record(&record, window)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    to_json(&occurrences)
}

/// Compute the free gaps between busy intervals within a window.
///
/// `busy_json` must be a JSON array of `{startDateTime, endDateTime}`
/// objects sorted by start time. Returns a JSON array of
/// `{startDateTime, endDateTime, duration}` slot objects.
#[wasm_bindgen(js_name = "freeSlots")]
pub fn free_slots(
    busy_json: &str,
    window_start: &str,
    window_end: &str,
) -> Result<String, JsValue> {
    let busy = parse_busy_json(busy_json)?;
    let window = parse_window(window_start, window_end)?;

    to_json(&rendez_engine::free_slots(&busy, window))
}

/// Ranked meeting proposals from a busy-interval list: sorts the intervals,
/// sweeps out the gaps, drops slots shorter than `min_duration` minutes when
/// given, and applies the daytime-preference reordering.
#[wasm_bindgen(js_name = "proposeSlots")]
pub fn propose_slots(
    busy_json: &str,
    window_start: &str,
    window_end: &str,
    min_duration: Option<i64>,
) -> Result<String, JsValue> {
    let mut busy = parse_busy_json(busy_json)?;
    let window = parse_window(window_start, window_end)?;

    busy.sort_by_key(|b| (b.start_date_time, b.end_date_time));
    let mut slots = rendez_engine::free_slots(&busy, window);
    if let Some(min) = min_duration {
        slots.retain(|s| s.duration >= min);
    }

    to_json(&rendez_engine::rank_by_daytime(slots, window))
}
