use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

const UUID: &str = "[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}";

static UUID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}$", UUID)).expect("uuid regex is valid"));
static HOST_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^([0-9]+|{})$", UUID)).expect("host id regex is valid")
});

/// Shape of the identifiers used by a resource collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdPattern {
    Uuid,
    /// Integer or uuid.
    HostId,
}

impl IdPattern {
    pub fn is_match(&self, token: &str) -> bool {
        match self {
            IdPattern::Uuid => UUID_REGEX.is_match(token),
            IdPattern::HostId => HOST_ID_REGEX.is_match(token),
        }
    }
}

/// Renders an `id` field, which the service reports either as a string or as a number.
pub fn id_text(record: &Map<String, Value>) -> Option<String> {
    match record.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Resolves `token` to an id among `records`. A token shaped like an id is
/// accepted as is; otherwise exactly one record must carry it under `name_key`.
pub fn find_resource_id(
    records: &[Map<String, Value>],
    name_key: &str,
    id_pattern: IdPattern,
    token: &str,
) -> Result<String> {
    if id_pattern.is_match(token) {
        return Ok(token.to_string());
    }

    let matches = records
        .iter()
        .filter(|record| record.get(name_key).and_then(Value::as_str) == Some(token))
        .collect::<Vec<_>>();

    match matches.as_slice() {
        [] => Err(Error::NotFound(format!(
            "Unable to find resource with name '{}'",
            token
        ))),
        [record] => id_text(record).ok_or_else(|| {
            Error::NotFound(format!("resource named '{}' does not have an id", token))
        }),
        _ => Err(Error::NoUniqueMatch(format!(
            "There are more than one appropriate resources for the name '{}' and key '{}'",
            token, name_key
        ))),
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn records(value: Value) -> Vec<Map<String, Value>> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|x| x.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_host_name_resolves_to_id() {
        let hosts = records(json!([
            {"id": "101", "hypervisor_hostname": "host-1"},
            {"id": "201", "hypervisor_hostname": "host-2"},
        ]));
        assert_eq!(
            find_resource_id(&hosts, "hypervisor_hostname", IdPattern::HostId, "host-1").unwrap(),
            "101"
        );
        assert_eq!(
            find_resource_id(&hosts, "hypervisor_hostname", IdPattern::HostId, "101").unwrap(),
            "101"
        );
    }

    #[test]
    fn test_id_token_skips_lookup() {
        assert_eq!(
            find_resource_id(&[], "hypervisor_hostname", IdPattern::HostId, "999").unwrap(),
            "999"
        );
        let uuid = "84c4d37e-1f8b-45ce-897b-16ad7f49b0e9";
        assert_eq!(
            find_resource_id(&[], "name", IdPattern::Uuid, uuid).unwrap(),
            uuid
        );
    }

    #[test]
    fn test_numeric_id_with_uuid_pattern_is_a_name() {
        let leases = records(json!([{"id": "84c4d37e-1f8b-45ce-897b-16ad7f49b0e9", "name": "42"}]));
        assert_eq!(
            find_resource_id(&leases, "name", IdPattern::Uuid, "42").unwrap(),
            "84c4d37e-1f8b-45ce-897b-16ad7f49b0e9"
        );
    }

    #[test]
    fn test_numeric_record_id_is_rendered() {
        let hosts = records(json!([{"id": 7, "hypervisor_hostname": "compute-7"}]));
        assert_eq!(
            find_resource_id(&hosts, "hypervisor_hostname", IdPattern::HostId, "compute-7")
                .unwrap(),
            "7"
        );
    }

    #[test]
    fn test_duplicate_names() {
        let hosts = records(json!([
            {"id": "101", "hypervisor_hostname": "host-1"},
            {"id": "102", "hypervisor_hostname": "host-1"},
        ]));
        let error = find_resource_id(&hosts, "hypervisor_hostname", IdPattern::HostId, "host-1")
            .unwrap_err();
        assert!(matches!(error, Error::NoUniqueMatch(_)));
        assert_eq!(error.code(), 409);
    }

    #[test]
    fn test_missing_name() {
        let error = find_resource_id(&[], "name", IdPattern::Uuid, "nope").unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));
        assert_eq!(error.code(), 404);
    }

    #[test]
    fn test_patterns() {
        assert!(IdPattern::HostId.is_match("12"));
        assert!(!IdPattern::HostId.is_match("12a"));
        assert!(IdPattern::HostId.is_match("84C4D37E-1F8B-45CE-897B-16AD7F49B0E9"));
        assert!(!IdPattern::Uuid.is_match("84c4d37e-1f8b-45ce-897b-16ad7f49b0e9-extra"));
        assert!(!IdPattern::Uuid.is_match("12"));
    }
}
