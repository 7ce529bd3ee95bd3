use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    client::RequestManager,
    error::{Error, Result},
    resource::ResourceKind,
    v1::resource::ResourceManager,
    Record,
};

/// Arguments of a network segment to enroll, validated by [`NetworkCreate::to_body`].
#[derive(Clone, Debug, Default)]
pub struct NetworkCreate {
    pub network_type: Option<String>,
    pub physical_network: Option<String>,
    pub segment_id: Option<String>,
    pub extras: BTreeMap<String, String>,
}

fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|x| !x.is_empty())
}

impl NetworkCreate {
    pub fn to_body(&self) -> Result<Record> {
        let mut values = Record::new();
        let network_type = given(&self.network_type)
            .ok_or_else(|| Error::IncorrectNetwork("--network-type is required".to_string()))?;
        values.insert(
            "network_type".to_string(),
            Value::String(network_type.to_string()),
        );

        let is_vlan = network_type == "vlan";
        let physical_network = match (given(&self.physical_network), is_vlan) {
            (Some(physical_network), true) => Value::String(physical_network.to_string()),
            (Some(_), false) => {
                return Err(Error::IncorrectNetwork(
                    "--physical-network is only valid for VLAN segments".to_string(),
                ))
            }
            (None, true) => {
                return Err(Error::IncorrectNetwork(
                    "--physical-network is required for VLAN segments".to_string(),
                ))
            }
            (None, false) => Value::Null,
        };
        values.insert("physical_network".to_string(), physical_network);

        let segment_id = given(&self.segment_id)
            .ok_or_else(|| Error::IncorrectNetwork("--segment is required".to_string()))?;
        values.insert(
            "segment_id".to_string(),
            Value::String(segment_id.to_string()),
        );

        for (key, value) in &self.extras {
            values.insert(key.clone(), Value::String(value.clone()));
        }
        Ok(values)
    }
}

pub struct NetworkManager<'a> {
    resource: ResourceManager<'a>,
}

impl<'a> NetworkManager<'a> {
    pub fn new(request: &'a RequestManager) -> NetworkManager<'a> {
        NetworkManager {
            resource: ResourceManager::new(request, ResourceKind::Network),
        }
    }

    pub async fn create(&self, network: &NetworkCreate) -> Result<Record> {
        let values = network.to_body()?;
        self.resource.create(&values).await
    }
}

impl<'a> std::ops::Deref for NetworkManager<'a> {
    type Target = ResourceManager<'a>;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn network(network_type: &str, physical: Option<&str>, segment: &str) -> NetworkCreate {
        NetworkCreate {
            network_type: Some(network_type.to_string()),
            physical_network: physical.map(str::to_string),
            segment_id: Some(segment.to_string()),
            extras: BTreeMap::new(),
        }
    }

    #[test]
    fn test_vlan_segment() {
        let mut network = network("vlan", Some("physnet1"), "1234");
        network
            .extras
            .insert("availability_zone".to_string(), "az1".to_string());
        assert_eq!(
            Value::Object(network.to_body().unwrap()),
            json!({
                "network_type": "vlan",
                "physical_network": "physnet1",
                "segment_id": "1234",
                "availability_zone": "az1",
            })
        );
    }

    #[test]
    fn test_vxlan_segment_has_null_physical_network() {
        let body = network("vxlan", None, "42").to_body().unwrap();
        assert_eq!(body["physical_network"], Value::Null);
    }

    #[test]
    fn test_invalid_segments() {
        let cases = [
            NetworkCreate::default(),
            network("vlan", None, "1"),
            network("vxlan", Some("physnet1"), "1"),
            network("flat", None, ""),
        ];
        for case in cases {
            let error = case.to_body().unwrap_err();
            assert!(matches!(error, Error::IncorrectNetwork(_)), "{:?}", case);
            assert_eq!(error.code(), 409);
        }
    }
}
