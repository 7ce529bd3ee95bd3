use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    client::RequestManager, error::Result, resource::ResourceKind,
    v1::resource::ResourceManager, Record,
};

pub const DEFAULT_DEVICE_TYPE: &str = "container";
pub const DEFAULT_DEVICE_DRIVER: &str = "zun";

pub struct DeviceManager<'a> {
    resource: ResourceManager<'a>,
}

impl<'a> DeviceManager<'a> {
    pub fn new(request: &'a RequestManager) -> DeviceManager<'a> {
        DeviceManager {
            resource: ResourceManager::new(request, ResourceKind::Device),
        }
    }

    pub async fn create(
        &self,
        name: &str,
        device_type: &str,
        device_driver: &str,
        extras: &BTreeMap<String, String>,
    ) -> Result<Record> {
        let mut values = Record::new();
        for (key, value) in [
            ("name", name),
            ("device_type", device_type),
            ("device_driver", device_driver),
        ] {
            if !value.is_empty() {
                values.insert(key.to_string(), Value::String(value.to_string()));
            }
        }
        for (key, value) in extras {
            values.insert(key.clone(), Value::String(value.clone()));
        }
        self.resource.create(&values).await
    }
}

impl<'a> std::ops::Deref for DeviceManager<'a> {
    type Target = ResourceManager<'a>;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}
