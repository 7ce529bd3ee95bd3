use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    client::RequestManager, error::Result, resource::ResourceKind,
    v1::resource::ResourceManager, Record,
};

pub struct HostManager<'a> {
    resource: ResourceManager<'a>,
}

impl<'a> HostManager<'a> {
    pub fn new(request: &'a RequestManager) -> HostManager<'a> {
        HostManager {
            resource: ResourceManager::new(request, ResourceKind::Host),
        }
    }

    /// Enrolls a compute host. Extra capabilities are sent next to the name.
    pub async fn create(&self, name: &str, extras: &BTreeMap<String, String>) -> Result<Record> {
        let mut values = Record::new();
        values.insert("name".to_string(), Value::String(name.to_string()));
        for (key, value) in extras {
            values.insert(key.clone(), Value::String(value.clone()));
        }
        self.resource.create(&values).await
    }
}

impl<'a> std::ops::Deref for HostManager<'a> {
    type Target = ResourceManager<'a>;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}
