//! HTTP client for the Remote Schedule Store
//!
//! Implements the `RemoteScheduleStore` port against the schedule API. The
//! list endpoint is parsed defensively: the body may be the bare array or an
//! object wrapping it under an arbitrary key, and individual records that
//! violate the one-of `{date, recurring}` invariant are dropped with a
//! warning rather than failing the whole read.

use async_trait::async_trait;
use chrono::NaiveDate;
use palco_core::week::iso_date;
use palco_core::RemoteScheduleStore;
use palco_domain::constants::WEEKDAY_NAMES;
use palco_domain::{
    weekday_index_of, BlockRequest, BlockSchedule, BlockedSlot, PalcoError, Result, Slot,
    SlotOrigin,
};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Wrapper keys probed before falling back to "any array-valued field".
const KNOWN_LIST_KEYS: [&str; 4] = ["blockedSlots", "data", "items", "results"];

/// Remote Schedule Store client.
pub struct HttpRemoteScheduleStore {
    http: HttpClient,
    base_url: String,
}

impl HttpRemoteScheduleStore {
    /// Create a client for the schedule API at `base_url`.
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<Value> {
        response.json().await.map_err(|err| {
            let infra: InfraError = err.into();
            PalcoError::from(infra)
        })
    }
}

#[async_trait]
impl RemoteScheduleStore for HttpRemoteScheduleStore {
    async fn fetch_blocked_slots(
        &self,
        space_id: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<BlockedSlot>> {
        let mut request =
            self.http.request(Method::GET, self.url(&format!("/spaces/blocked-slots/{space_id}")));
        if let Some(date) = date {
            request = request.query(&[("date", iso_date(date))]);
        }
        request = request.header("X-Request-Id", Uuid::new_v4().to_string());

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(PalcoError::Network(format!("schedule API error ({status}): {body}")));
        }

        let body = self.read_json(response).await?;
        Ok(parse_blocked_slots(space_id, body))
    }

    async fn create_blocked_slot(
        &self,
        space_id: &str,
        request: &BlockRequest,
    ) -> Result<BlockedSlot> {
        let (slot, schedule) = request.validate()?;
        let body = CreateBlockedSlotBody {
            day: schedule.weekday(),
            hour: slot.hour(),
            is_recurring: schedule.is_recurring(),
            day_name: WEEKDAY_NAMES[schedule.weekday() as usize],
            date: schedule.date().map(iso_date),
        };

        let http_request = self
            .http
            .request(
                Method::POST,
                self.url(&format!("/spaces/blocked-slots/space/{space_id}")),
            )
            .header("X-Request-Id", Uuid::new_v4().to_string())
            .json(&body);

        let response = self.http.send(http_request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(PalcoError::Network(format!(
                "blocked slot creation failed ({status}): {body}"
            )));
        }

        let body = self.read_json(response).await?;
        let record_value = extract_record(&body).ok_or_else(|| {
            PalcoError::Network("create response carried no blocked-slot record".into())
        })?;
        let record: BlockedSlotRecord =
            serde_json::from_value(record_value.clone()).map_err(|err| {
                PalcoError::Network(format!("could not parse created blocked slot: {err}"))
            })?;

        record_to_slot(record, space_id)
    }

    async fn delete_blocked_slot(&self, blocked_slot_id: &str) -> Result<()> {
        let request = self
            .http
            .request(
                Method::DELETE,
                self.url(&format!("/spaces/blocked-slots/{blocked_slot_id}")),
            )
            .header("X-Request-Id", Uuid::new_v4().to_string());

        let response = self.http.send(request).await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                Err(PalcoError::NotFound(format!("blocked slot {blocked_slot_id}")))
            }
            status => {
                let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
                Err(PalcoError::Network(format!(
                    "blocked slot deletion failed ({status}): {body}"
                )))
            }
        }
    }
}

/// Wire shape of one blocked-slot record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockedSlotRecord {
    id: String,
    hour: u8,
    #[serde(default)]
    day: Option<u8>,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    is_recurring: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBlockedSlotBody<'a> {
    day: u8,
    hour: u8,
    is_recurring: bool,
    day_name: &'a str,
    date: Option<String>,
}

/// Parse a list response into domain records, dropping anything malformed.
fn parse_blocked_slots(space_id: &str, body: Value) -> Vec<BlockedSlot> {
    let elements = extract_list(body);
    let total = elements.len();

    let slots: Vec<BlockedSlot> = elements
        .into_iter()
        .filter_map(|element| {
            let record: BlockedSlotRecord = match serde_json::from_value(element) {
                Ok(record) => record,
                Err(err) => {
                    warn!(space_id, error = %err, "skipping unparseable blocked-slot record");
                    return None;
                }
            };
            let record_id = record.id.clone();
            match record_to_slot(record, space_id) {
                Ok(slot) => Some(slot),
                Err(err) => {
                    warn!(space_id, record_id = %record_id, error = %err, "skipping invalid blocked-slot record");
                    None
                }
            }
        })
        .collect();

    if slots.len() < total {
        debug!(space_id, kept = slots.len(), total, "dropped malformed blocked-slot records");
    }
    slots
}

/// Locate the record array inside a tolerant list response.
fn extract_list(body: Value) -> Vec<Value> {
    match body {
        Value::Array(elements) => elements,
        Value::Object(map) => {
            for key in KNOWN_LIST_KEYS {
                if let Some(Value::Array(elements)) = map.get(key) {
                    return elements.clone();
                }
            }
            // Any array-valued field will do; servers have wrapped this list
            // under more than one name over time.
            for value in map.into_iter().map(|(_, value)| value) {
                if let Value::Array(elements) = value {
                    return elements;
                }
            }
            warn!("blocked-slot response object carried no array field");
            Vec::new()
        }
        other => {
            warn!(kind = %value_kind(&other), "unexpected blocked-slot response shape");
            Vec::new()
        }
    }
}

/// Locate the single record inside a create response, bare or wrapped.
fn extract_record(body: &Value) -> Option<&Value> {
    match body {
        Value::Object(map) if map.contains_key("hour") => Some(body),
        Value::Object(map) => map
            .values()
            .find(|value| matches!(value, Value::Object(inner) if inner.contains_key("hour"))),
        _ => None,
    }
}

/// Convert one wire record into the strict domain type, enforcing the one-of
/// `{date, recurring}` invariant and deriving the weekday from the date.
fn record_to_slot(record: BlockedSlotRecord, space_id: &str) -> Result<BlockedSlot> {
    let hour = Slot::new(record.hour)?;

    let schedule = match (record.is_recurring, record.date) {
        (true, Some(_)) => {
            return Err(PalcoError::Validation(
                "record claims to be both recurring and date-specific".into(),
            ));
        }
        (true, None) => {
            let weekday = record.day.ok_or_else(|| {
                PalcoError::Validation("recurring record is missing its weekday".into())
            })?;
            if weekday > 6 {
                return Err(PalcoError::Validation(format!(
                    "weekday index {weekday} is outside 0..=6"
                )));
            }
            BlockSchedule::Weekly { weekday }
        }
        (false, Some(date)) => {
            // The stored day is only a cache of the derivation from the
            // date; when the two disagree (stale data, old timezone bugs)
            // the date wins.
            let derived = weekday_index_of(date);
            if let Some(stored) = record.day {
                if stored != derived {
                    warn!(
                        record_id = %record.id,
                        stored,
                        derived,
                        "stored weekday disagrees with date; trusting the date"
                    );
                }
            }
            BlockSchedule::OnDate { date }
        }
        (false, None) => {
            return Err(PalcoError::Validation(
                "record is neither recurring nor dated".into(),
            ));
        }
    };

    Ok(BlockedSlot {
        id: record.id,
        space_id: space_id.to_string(),
        hour,
        schedule,
        origin: SlotOrigin::Server,
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
