use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{Error, Result},
    params::{
        parse_event, parse_physical_reservation, parse_reservation, parse_update_reservation,
        EventSpec,
    },
    timeutil::{format_api_date, from_elapsed_time_to_delta, parse_api_date, shift_lease_date},
    Record,
};

/// Start date understood by the service as "as soon as the lease is created".
pub const START_NOW: &str = "now";

/// Raw command line values of a lease to create.
#[derive(Clone, Debug, Default)]
pub struct LeaseCreateArgs {
    pub name: String,
    pub start: String,
    /// Defaults to one day after `now`.
    pub end: Option<String>,
    pub before_end: Option<String>,
    pub reservations: Vec<String>,
    pub physical_reservations: Vec<String>,
    pub events: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaseCreateRequest {
    pub name: String,
    #[serde(rename = "start_date")]
    pub start: String,
    #[serde(rename = "end_date")]
    pub end: String,
    pub reservations: Vec<Record>,
    pub events: Vec<EventSpec>,
    #[serde(rename = "before_end_date")]
    pub before_end: Option<String>,
}

fn parse_lease_date_arg(value: &str) -> Result<NaiveDateTime> {
    parse_api_date(value).ok_or_else(Error::incorrect_lease)
}

impl LeaseCreateArgs {
    /// Validates the dates and parses every reservation and event token.
    /// `now` stands in for the server's clock when the start is `now`; it
    /// is only used for the ordering checks and never sent.
    pub fn to_request(&self, now: NaiveDateTime) -> Result<LeaseCreateRequest> {
        let start = if self.start == START_NOW {
            None
        } else {
            Some(parse_lease_date_arg(&self.start)?)
        };
        let end = match self.end {
            Some(ref end) => parse_lease_date_arg(end)?,
            None => now + Duration::days(1),
        };

        let effective_start = start.unwrap_or(now);
        if effective_start > end {
            return Err(Error::incorrect_lease());
        }

        let before_end = match self.before_end {
            Some(ref before_end) => {
                let before_end = parse_lease_date_arg(before_end)?;
                if before_end < effective_start || end < before_end {
                    return Err(Error::incorrect_lease());
                }
                Some(format_api_date(&before_end))
            }
            None => None,
        };

        let mut reservations = Vec::new();
        for token in &self.physical_reservations {
            reservations.push(parse_physical_reservation(token)?);
        }
        for token in &self.reservations {
            reservations.push(parse_reservation(token)?);
        }
        if reservations.is_empty() {
            return Err(Error::incorrect_lease());
        }

        let events = self
            .events
            .iter()
            .map(|x| parse_event(x))
            .collect::<Result<Vec<_>>>()?;

        Ok(LeaseCreateRequest {
            name: self.name.clone(),
            start: match start {
                Some(start) => format_api_date(&start),
                None => START_NOW.to_string(),
            },
            end: format_api_date(&end),
            reservations,
            events,
            before_end,
        })
    }
}

/// Changes requested for an existing lease. Relative shifts are applied to
/// the dates currently stored on the lease, not to the current time.
#[derive(Clone, Debug, Default)]
pub struct LeaseUpdate {
    pub name: Option<String>,
    pub prolong_for: Option<String>,
    pub reduce_by: Option<String>,
    pub end_date: Option<String>,
    pub defer_by: Option<String>,
    pub advance_by: Option<String>,
    pub start_date: Option<String>,
    pub reservations: Vec<Record>,
}

impl LeaseUpdate {
    pub fn parse_reservations(tokens: &[String]) -> Result<Vec<Record>> {
        tokens.iter().map(|x| parse_update_reservation(x)).collect()
    }

    fn end_change(&self) -> Option<DateChange<'_>> {
        if let Some(ref date) = self.end_date {
            Some(DateChange::Absolute(date))
        } else if let Some(ref delta) = self.prolong_for {
            Some(DateChange::Relative(delta, true))
        } else {
            self.reduce_by
                .as_deref()
                .map(|delta| DateChange::Relative(delta, false))
        }
    }

    fn start_change(&self) -> Option<DateChange<'_>> {
        if let Some(ref date) = self.start_date {
            Some(DateChange::Absolute(date))
        } else if let Some(ref delta) = self.defer_by {
            Some(DateChange::Relative(delta, true))
        } else {
            self.advance_by
                .as_deref()
                .map(|delta| DateChange::Relative(delta, false))
        }
    }

    /// Whether the stored lease must be fetched before building the body.
    pub fn needs_current_lease(&self) -> bool {
        self.end_change().is_some() || self.start_change().is_some()
    }

    pub fn to_body(&self, current: Option<&Record>) -> Result<Record> {
        let mut values = Record::new();
        if let Some(ref name) = self.name {
            if !name.is_empty() {
                values.insert("name".to_string(), Value::String(name.clone()));
            }
        }

        if let Some(change) = self.end_change() {
            values.insert(
                "end_date".to_string(),
                Value::String(change.resolve(current, "end_date")?),
            );
        }

        if let Some(change) = self.start_change() {
            values.insert(
                "start_date".to_string(),
                Value::String(change.resolve(current, "start_date")?),
            );
        }

        if !self.reservations.is_empty() {
            values.insert(
                "reservations".to_string(),
                Value::Array(
                    self.reservations
                        .iter()
                        .cloned()
                        .map(Value::Object)
                        .collect(),
                ),
            );
        }
        Ok(values)
    }
}

enum DateChange<'a> {
    Absolute(&'a str),
    Relative(&'a str, bool),
}

impl DateChange<'_> {
    fn resolve(&self, current: Option<&Record>, key: &str) -> Result<String> {
        match self {
            DateChange::Absolute(date) => Ok(format_api_date(&parse_lease_date_arg(date)?)),
            DateChange::Relative(delta, positive) => {
                let delta = from_elapsed_time_to_delta(delta, *positive)?;
                let stored = current
                    .and_then(|lease| lease.get(key))
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        Error::client(format!("the lease does not report a current {}", key))
                    })?;
                shift_lease_date(stored, delta)
            }
        }
    }
}
