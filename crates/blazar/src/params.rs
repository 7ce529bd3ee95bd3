//! Parser for the `key=value,key=value` reservation and event arguments.
//!
//! Values of some keys are JSON arrays that may themselves contain commas,
//! for example `hypervisor_properties=["and",[">=","$vcpus","2"]]`. A comma
//! only separates two parameters when it is directly followed by one of the
//! keys declared for the reservation type, so the parser repeatedly peels
//! the right-most `known_key=value` pair off the end of the input.

use std::collections::BTreeMap;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};
use crate::timeutil::{format_api_date, parse_api_date};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Kept as a string unless it is integer-like.
    Scalar,
    /// Decoded as a JSON document unless it is integer-like.
    Json,
}

#[derive(Clone, Copy, Debug)]
pub enum KeyDefault {
    /// Omitted from the request body when not supplied.
    Absent,
    Text(&'static str),
    Integer(i64),
    EmptyList,
}

impl KeyDefault {
    fn to_value(self) -> Option<Value> {
        match self {
            KeyDefault::Absent => None,
            KeyDefault::Text(text) => Some(Value::String(text.to_string())),
            KeyDefault::Integer(number) => Some(Value::from(number)),
            KeyDefault::EmptyList => Some(Value::Array(Vec::new())),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct KeySpec {
    pub name: &'static str,
    pub kind: ValueKind,
    pub default: KeyDefault,
}

const fn key(name: &'static str, default: KeyDefault) -> KeySpec {
    KeySpec {
        name,
        kind: ValueKind::Scalar,
        default,
    }
}

const fn json_key(name: &'static str, default: KeyDefault) -> KeySpec {
    KeySpec {
        name,
        kind: ValueKind::Json,
        default,
    }
}

/// Set of keys understood for one kind of reservation token.
#[derive(Clone, Copy, Debug)]
pub enum KeyTable {
    /// Only the listed keys are accepted.
    Declared(&'static [KeySpec]),
    /// Any key is accepted and no defaults are merged.
    Any,
}

pub const PHYSICAL_HOST_KEYS: &[KeySpec] = &[
    key("min", KeyDefault::Text("")),
    key("max", KeyDefault::Text("")),
    key("hypervisor_properties", KeyDefault::Text("")),
    key("resource_properties", KeyDefault::Text("")),
    key("before_end", KeyDefault::Absent),
    key("resource_type", KeyDefault::Text(PHYSICAL_HOST)),
];

pub const VIRTUAL_FLOATINGIP_KEYS: &[KeySpec] = &[
    key("amount", KeyDefault::Integer(1)),
    key("network_id", KeyDefault::Absent),
    json_key("required_floatingips", KeyDefault::EmptyList),
    key("resource_type", KeyDefault::Text(VIRTUAL_FLOATINGIP)),
];

pub const VIRTUAL_INSTANCE_KEYS: &[KeySpec] = &[
    key("vcpus", KeyDefault::Text("")),
    key("memory_mb", KeyDefault::Text("")),
    key("disk_gb", KeyDefault::Text("")),
    key("amount", KeyDefault::Text("")),
    key("affinity", KeyDefault::Text("None")),
    key("resource_properties", KeyDefault::Text("")),
    key("resource_type", KeyDefault::Text(VIRTUAL_INSTANCE)),
];

/// Keys accepted by `--reservation` when updating an existing lease.
pub const UPDATE_RESERVATION_KEYS: &[KeySpec] = &[
    key("id", KeyDefault::Absent),
    key("min", KeyDefault::Absent),
    key("max", KeyDefault::Absent),
    key("hypervisor_properties", KeyDefault::Absent),
    key("resource_properties", KeyDefault::Absent),
    key("vcpus", KeyDefault::Absent),
    key("memory_mb", KeyDefault::Absent),
    key("disk_gb", KeyDefault::Absent),
    key("amount", KeyDefault::Absent),
    key("affinity", KeyDefault::Absent),
    key("network_id", KeyDefault::Absent),
    json_key("required_floatingips", KeyDefault::Absent),
];

pub const PHYSICAL_HOST: &str = "physical:host";
pub const VIRTUAL_INSTANCE: &str = "virtual:instance";
pub const VIRTUAL_FLOATINGIP: &str = "virtual:floatingip";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReservationKind {
    PhysicalHost,
    VirtualInstance,
    VirtualFloatingIp,
    Other,
}

impl ReservationKind {
    /// Picks the reservation kind by looking for the resource type literal
    /// anywhere in the token. A value that happens to contain one of the
    /// literals selects that kind even if `resource_type` says otherwise.
    pub fn classify(token: &str) -> ReservationKind {
        if token.contains(PHYSICAL_HOST) {
            ReservationKind::PhysicalHost
        } else if token.contains(VIRTUAL_INSTANCE) {
            ReservationKind::VirtualInstance
        } else if token.contains(VIRTUAL_FLOATINGIP) {
            ReservationKind::VirtualFloatingIp
        } else {
            ReservationKind::Other
        }
    }

    pub fn keys(&self) -> KeyTable {
        match self {
            ReservationKind::PhysicalHost => KeyTable::Declared(PHYSICAL_HOST_KEYS),
            ReservationKind::VirtualInstance => KeyTable::Declared(VIRTUAL_INSTANCE_KEYS),
            ReservationKind::VirtualFloatingIp => KeyTable::Declared(VIRTUAL_FLOATINGIP_KEYS),
            ReservationKind::Other => KeyTable::Any,
        }
    }
}

/// Matches the `str(int(value)) == value` rule: optional minus sign,
/// digits, no leading zeros and no surrounding whitespace. Values past
/// `u64::MAX` stay text.
pub fn is_int_like(value: &str) -> Option<Number> {
    let number = match value.parse::<i64>() {
        Ok(number) => Number::from(number),
        Err(_) => Number::from(value.parse::<u64>().ok()?),
    };
    if number.to_string() == value {
        Some(number)
    } else {
        None
    }
}

fn key_pattern(table: &KeyTable) -> Result<Regex> {
    let keys = match table {
        KeyTable::Declared(specs) => specs
            .iter()
            .map(|spec| regex::escape(spec.name))
            .collect::<Vec<_>>()
            .join("|"),
        KeyTable::Any => ".*".to_string(),
    };
    Regex::new(&format!("^(?:(.*),)?({})=(.*)$", keys))
        .map_err(|error| Error::client(format!("invalid reservation key pattern: {}", error)))
}

fn decode_value(table: &KeyTable, key: &str, raw: &str, err_msg: &str) -> Result<Value> {
    if let Some(number) = is_int_like(raw) {
        return Ok(Value::Number(number));
    }

    let kind = match table {
        KeyTable::Declared(specs) => specs
            .iter()
            .find(|spec| spec.name == key)
            .map(|spec| spec.kind)
            .unwrap_or(ValueKind::Scalar),
        KeyTable::Any => ValueKind::Scalar,
    };

    match kind {
        ValueKind::Scalar => Ok(Value::String(raw.to_string())),
        ValueKind::Json => serde_json::from_str(raw)
            .map_err(|error| Error::IncorrectLease(format!("{} ({}: {})", err_msg, key, error))),
    }
}

/// Parses a single `key=value,...` token against a key table and merges the
/// table's defaults for keys that were not supplied.
pub fn parse_params(token: &str, table: &KeyTable, err_msg: &str) -> Result<Map<String, Value>> {
    let pattern = key_pattern(table)?;
    let mut supplied = Map::new();
    let mut remaining = token;

    while !remaining.is_empty() {
        let captures = pattern
            .captures(remaining)
            .ok_or_else(|| Error::IncorrectLease(err_msg.to_string()))?;
        let key = captures.get(2).map(|x| x.as_str()).unwrap_or_default();
        let raw = captures.get(3).map(|x| x.as_str()).unwrap_or_default();
        debug!("reservation parameter matched: {}={}", key, raw);

        if supplied.contains_key(key) {
            return Err(Error::DuplicatedLeaseParameters(err_msg.to_string()));
        }
        let value = decode_value(table, key, raw, err_msg)?;
        supplied.insert(key.to_string(), value);

        remaining = captures.get(1).map(|x| x.as_str()).unwrap_or_default();
    }

    if let KeyTable::Declared(specs) = table {
        for spec in specs.iter() {
            if supplied.contains_key(spec.name) {
                continue;
            }
            if let Some(value) = spec.default.to_value() {
                supplied.insert(spec.name.to_string(), value);
            }
        }
    }

    Ok(supplied)
}

/// Parses a generic `--reservation` token of a lease being created.
pub fn parse_reservation(token: &str) -> Result<Map<String, Value>> {
    let err_msg = format!(
        "Invalid reservation argument '{}'. Reservation arguments must be of the form --reservation <key=value>",
        token
    );
    let kind = ReservationKind::classify(token);
    parse_params(token, &kind.keys(), &err_msg)
}

/// Parses a `--physical-reservation` token and checks its host counts.
pub fn parse_physical_reservation(token: &str) -> Result<Map<String, Value>> {
    let err_msg = format!(
        "Invalid physical-reservation argument '{}'. Reservation arguments must be of the form --physical-reservation <min=int,max=int,hypervisor_properties=str,resource_properties=str,before_end=str>",
        token
    );
    let mut reservation = parse_params(
        token,
        &KeyTable::Declared(PHYSICAL_HOST_KEYS),
        &err_msg,
    )?;

    let min = reservation.get("min").and_then(Value::as_i64);
    let max = reservation.get("max").and_then(Value::as_i64);
    let (Some(min), Some(max)) = (min, max) else {
        return Err(Error::IncorrectLease(err_msg));
    };

    if min > max {
        return Err(Error::IncorrectLease(format!(
            "Invalid physical-reservation argument '{}'. Reservation argument min value must be less than max value",
            token
        )));
    }

    if min < 1 || max < 1 {
        return Err(Error::IncorrectLease(format!(
            "Invalid physical-reservation argument '{}'. Reservation arguments min and max values must be greater than or equal to 1",
            token
        )));
    }

    reservation.insert(
        "resource_type".to_string(),
        Value::String(PHYSICAL_HOST.to_string()),
    );
    Ok(reservation)
}

/// Parses a `--reservation` token of a lease update, which must select the
/// reservation with `id=<reservation-id>`.
pub fn parse_update_reservation(token: &str) -> Result<Map<String, Value>> {
    let err_msg = format!(
        "Invalid reservation argument '{}'. Reservation arguments must be of the form --reservation <key=value>",
        token
    );
    let reservation = parse_params(
        token,
        &KeyTable::Declared(UPDATE_RESERVATION_KEYS),
        &err_msg,
    )?;
    if !reservation.contains_key("id") {
        return Err(Error::IncorrectLease(
            "The key-value pair id=<reservation_id> is required for the --reservation argument"
                .to_string(),
        ));
    }
    Ok(reservation)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSpec {
    pub event_type: String,
    pub event_date: String,
}

/// Parses `event_type=<str>,event_date=<YYYY-MM-DD HH:MM>`.
pub fn parse_event(token: &str) -> Result<EventSpec> {
    let err_msg = format!(
        "Invalid event argument '{}'. Event arguments must be of the form --event <event_type=str,event_date=time>",
        token
    );
    let mut event_type = String::new();
    let mut event_date = String::new();

    for item in token.split(',') {
        let Some((key, value)) = item.split_once('=') else {
            return Err(Error::IncorrectLease(err_msg));
        };
        match key {
            "event_type" => event_type = value.to_string(),
            "event_date" => event_date = value.to_string(),
            _ => return Err(Error::IncorrectLease(err_msg)),
        }
    }

    if event_type.is_empty() && event_date.is_empty() {
        return Err(Error::IncorrectLease(err_msg));
    }

    let date = parse_api_date(&event_date).ok_or_else(Error::incorrect_lease)?;
    Ok(EventSpec {
        event_type,
        event_date: format_api_date(&date),
    })
}

/// Collects `--extra key=value` items. Later copies of a key win and an item
/// without `=` maps to an empty value.
pub fn parse_extra_capabilities(items: &[String]) -> BTreeMap<String, String> {
    let mut extras = BTreeMap::new();
    for item in items {
        let (key, value) = item.split_once('=').unwrap_or((item.as_str(), ""));
        extras.insert(key.to_string(), value.to_string());
    }
    extras
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    const HYPERVISOR_PROPERTIES: &str =
        r#"["and", [">=", "$vcpus", "2"], [">=", "$memory_mb", "2048"]]"#;
    const RESOURCE_PROPERTIES: &str = r#"["==", "$extra_key", "extra_value"]"#;

    fn physical_token(prefix: &str) -> String {
        format!(
            "{}min=1,max=2,hypervisor_properties={},resource_properties={},before_end=default",
            prefix, HYPERVISOR_PROPERTIES, RESOURCE_PROPERTIES
        )
    }

    #[test]
    fn test_physical_reservation_keeps_json_as_strings() {
        let reservation = parse_physical_reservation(&physical_token("")).unwrap();
        assert_eq!(
            Value::Object(reservation),
            json!({
                "min": 1,
                "max": 2,
                "hypervisor_properties": HYPERVISOR_PROPERTIES,
                "resource_properties": RESOURCE_PROPERTIES,
                "resource_type": "physical:host",
                "before_end": "default",
            })
        );
    }

    #[test]
    fn test_physical_reservation_omits_absent_before_end() {
        let reservation = parse_physical_reservation("min=2,max=3").unwrap();
        assert_eq!(
            Value::Object(reservation),
            json!({
                "min": 2,
                "max": 3,
                "hypervisor_properties": "",
                "resource_properties": "",
                "resource_type": "physical:host",
            })
        );
    }

    #[test]
    fn test_physical_reservation_min_greater_than_max() {
        let error = parse_physical_reservation("min=5,max=2").unwrap_err();
        assert!(matches!(error, Error::IncorrectLease(_)));
    }

    #[test]
    fn test_physical_reservation_zero_and_missing_counts() {
        for token in ["min=0,max=2", "min=0,max=0", "max=2", "min=1", "min=a,max=2", ""] {
            let error = parse_physical_reservation(token).unwrap_err();
            assert!(matches!(error, Error::IncorrectLease(_)), "{}", token);
        }
    }

    #[test]
    fn test_physical_reservation_duplicated_key() {
        let error = parse_physical_reservation(&physical_token("min=1,")).unwrap_err();
        assert!(matches!(error, Error::DuplicatedLeaseParameters(_)));
        assert_eq!(error.code(), 400);
    }

    #[test]
    fn test_physical_reservation_unknown_key() {
        let error = parse_physical_reservation(&physical_token("incorrect_param=1,")).unwrap_err();
        assert!(matches!(error, Error::IncorrectLease(_)));
        assert_eq!(error.code(), 409);
    }

    #[test]
    fn test_instance_reservation() {
        let token = format!(
            "vcpus=4,memory_mb=1024,disk_gb=10,amount=2,affinity=True,resource_properties={},resource_type=virtual:instance",
            RESOURCE_PROPERTIES
        );
        let reservation = parse_reservation(&token).unwrap();
        assert_eq!(
            Value::Object(reservation),
            json!({
                "vcpus": 4,
                "memory_mb": 1024,
                "disk_gb": 10,
                "amount": 2,
                "affinity": "True",
                "resource_properties": RESOURCE_PROPERTIES,
                "resource_type": "virtual:instance",
            })
        );
    }

    #[test]
    fn test_instance_reservation_defaults() {
        let reservation = parse_reservation("vcpus=2,resource_type=virtual:instance").unwrap();
        assert_eq!(reservation["affinity"], json!("None"));
        assert_eq!(reservation["memory_mb"], json!(""));
        assert_eq!(reservation["vcpus"], json!(2));
    }

    #[test]
    fn test_instance_reservation_keeps_large_counts_numeric() {
        let reservation =
            parse_reservation("vcpus=18446744073709551615,resource_type=virtual:instance")
                .unwrap();
        assert_eq!(reservation["vcpus"], json!(18446744073709551615u64));
    }

    #[test]
    fn test_floatingip_reservation_decodes_json_lists() {
        let token = r#"network_id=net-1,required_floatingips=["172.24.4.10","172.24.4.11"],resource_type=virtual:floatingip"#;
        let reservation = parse_reservation(token).unwrap();
        assert_eq!(
            Value::Object(reservation),
            json!({
                "network_id": "net-1",
                "required_floatingips": ["172.24.4.10", "172.24.4.11"],
                "amount": 1,
                "resource_type": "virtual:floatingip",
            })
        );
    }

    #[test]
    fn test_floatingip_reservation_bad_json() {
        let token = "required_floatingips=[oops,resource_type=virtual:floatingip";
        let error = parse_reservation(token).unwrap_err();
        assert!(matches!(error, Error::IncorrectLease(_)));
    }

    #[test]
    fn test_other_reservation_accepts_any_key() {
        let reservation =
            parse_reservation("resource_type=network,network_name=foo,count=3").unwrap();
        assert_eq!(
            Value::Object(reservation),
            json!({
                "resource_type": "network",
                "network_name": "foo",
                "count": 3,
            })
        );
    }

    #[test]
    fn test_other_reservation_requires_key_value_shape() {
        let error = parse_reservation("resource_type").unwrap_err();
        assert!(matches!(error, Error::IncorrectLease(_)));
    }

    #[test]
    fn test_classification_is_substring_based() {
        assert_eq!(
            ReservationKind::classify("resource_type=physical:host,min=1"),
            ReservationKind::PhysicalHost
        );
        assert_eq!(
            ReservationKind::classify("resource_type=virtual:floatingip"),
            ReservationKind::VirtualFloatingIp
        );
        assert_eq!(
            ReservationKind::classify("resource_type=network"),
            ReservationKind::Other
        );
        // a property value mentioning another type wins over resource_type
        assert_eq!(
            ReservationKind::classify(
                r#"resource_type=virtual:floatingip,note=["virtual:instance"]"#
            ),
            ReservationKind::VirtualInstance
        );
    }

    #[test]
    fn test_int_like() {
        assert_eq!(is_int_like("12"), Some(Number::from(12)));
        assert_eq!(is_int_like("-3"), Some(Number::from(-3)));
        assert_eq!(is_int_like("0"), Some(Number::from(0)));
        assert_eq!(
            is_int_like("18446744073709551615"),
            Some(Number::from(u64::MAX))
        );
        assert_eq!(is_int_like("-9223372036854775809"), None);
        assert_eq!(is_int_like("01"), None);
        assert_eq!(is_int_like("+1"), None);
        assert_eq!(is_int_like(" 1"), None);
        assert_eq!(is_int_like("1.0"), None);
        assert_eq!(is_int_like(""), None);
    }

    #[test]
    fn test_update_reservation() {
        let token = format!(
            "id=798379a6-194c-45dc-ba34-1b5171d5552f,max=3,hypervisor_properties={},resource_properties={}",
            HYPERVISOR_PROPERTIES, RESOURCE_PROPERTIES
        );
        let reservation = parse_update_reservation(&token).unwrap();
        assert_eq!(
            Value::Object(reservation),
            json!({
                "id": "798379a6-194c-45dc-ba34-1b5171d5552f",
                "max": 3,
                "hypervisor_properties": HYPERVISOR_PROPERTIES,
                "resource_properties": RESOURCE_PROPERTIES,
            })
        );
    }

    #[test]
    fn test_update_reservation_requires_id() {
        let error = parse_update_reservation("max=3,amount=2").unwrap_err();
        assert!(matches!(error, Error::IncorrectLease(_)));
    }

    #[test]
    fn test_event_is_canonicalized() {
        let event = parse_event("event_type=notification,event_date=2020-7-4 9:05").unwrap();
        assert_eq!(
            event,
            EventSpec {
                event_type: "notification".to_string(),
                event_date: "2020-07-04 09:05".to_string(),
            }
        );
    }

    #[test]
    fn test_event_errors() {
        for token in [
            "event_type=notification",
            "event_type=x,event_date=bad",
            "event_kind=x,event_date=2020-07-04 09:05",
            "event_type",
            "event_type=,event_date=",
        ] {
            let error = parse_event(token).unwrap_err();
            assert!(matches!(error, Error::IncorrectLease(_)), "{}", token);
        }
    }

    #[test]
    fn test_extra_capabilities() {
        let extras = parse_extra_capabilities(&[
            "gpu=true".to_string(),
            "rack=a=b".to_string(),
            "flag".to_string(),
            "gpu=false".to_string(),
        ]);
        assert_eq!(extras.get("gpu").map(String::as_str), Some("false"));
        assert_eq!(extras.get("rack").map(String::as_str), Some("a=b"));
        assert_eq!(extras.get("flag").map(String::as_str), Some(""));
    }
}
