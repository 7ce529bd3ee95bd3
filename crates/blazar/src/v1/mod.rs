use std::cmp::Ordering;

use serde_json::Value;

use crate::{
    error::{Error, Result},
    Record,
};

pub mod allocations;
pub mod devices;
pub mod floatingips;
pub mod hosts;
pub mod leases;
pub mod networks;
pub mod resource;

pub(crate) fn take_record(body: Option<Value>, key: &str) -> Result<Record> {
    match body {
        Some(Value::Object(mut body)) => match body.remove(key) {
            Some(Value::Object(record)) => Ok(record),
            _ => Err(missing_field(key)),
        },
        _ => Err(missing_field(key)),
    }
}

pub(crate) fn take_records(body: Option<Value>, key: &str) -> Result<Vec<Record>> {
    match body {
        Some(Value::Object(mut body)) => match body.remove(key) {
            Some(Value::Array(items)) => Ok(items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(record) => Some(record),
                    _ => None,
                })
                .collect()),
            _ => Err(missing_field(key)),
        },
        _ => Err(missing_field(key)),
    }
}

fn missing_field(key: &str) -> Error {
    Error::client(format!("response body is missing the '{}' field", key))
}

/// Orders JSON values: missing and null first, then booleans, numbers and
/// strings by their natural order, anything else by its JSON text.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (
            Some(a @ (Value::Array(_) | Value::Object(_))),
            Some(b @ (Value::Array(_) | Value::Object(_))),
        ) => a.to_string().cmp(&b.to_string()),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Stable sort of records by the value stored under `key`.
pub fn sort_records(records: &mut [Record], key: &str) {
    records.sort_by(|a, b| compare_values(a.get(key), b.get(key)));
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_sort_records_by_key() {
        let mut records = vec![
            record(json!({"name": "c", "vcpus": 8})),
            record(json!({"name": "a", "vcpus": 16})),
            record(json!({"name": "b", "vcpus": 2})),
        ];
        sort_records(&mut records, "name");
        let names = records
            .iter()
            .map(|x| x["name"].as_str().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "b", "c"]);

        sort_records(&mut records, "vcpus");
        let vcpus = records
            .iter()
            .map(|x| x["vcpus"].as_i64().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(vcpus, vec![2, 8, 16]);
    }

    #[test]
    fn test_missing_values_sort_first() {
        let mut records = vec![
            record(json!({"name": "b"})),
            record(json!({})),
            record(json!({"name": null})),
        ];
        sort_records(&mut records, "name");
        assert!(records[0].get("name").is_none());
        assert_eq!(records[1]["name"], Value::Null);
        assert_eq!(records[2]["name"], json!("b"));
    }

    #[test]
    fn test_take_record_requires_key() {
        let body = Some(json!({"lease": {"id": "1"}}));
        assert_eq!(take_record(body, "lease").unwrap()["id"], json!("1"));
        assert!(take_record(Some(json!({"host": {}})), "lease").is_err());
        assert!(take_record(None, "lease").is_err());
        assert!(take_records(Some(json!({"leases": {}})), "leases").is_err());
    }
}
