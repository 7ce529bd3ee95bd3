use serde::Serialize;

use crate::{
    client::RequestManager, error::Result, resource::ResourceKind,
    v1::resource::ResourceManager, Record,
};

#[derive(Clone, Debug, Serialize)]
struct FloatingIpCreate<'a> {
    floating_network_id: &'a str,
    floating_ip_address: &'a str,
}

pub struct FloatingIpManager<'a> {
    resource: ResourceManager<'a>,
}

impl<'a> FloatingIpManager<'a> {
    pub fn new(request: &'a RequestManager) -> FloatingIpManager<'a> {
        FloatingIpManager {
            resource: ResourceManager::new(request, ResourceKind::FloatingIp),
        }
    }

    pub async fn create(&self, network_id: &str, floating_ip_address: &str) -> Result<Record> {
        self.resource
            .create(&FloatingIpCreate {
                floating_network_id: network_id,
                floating_ip_address,
            })
            .await
    }
}

impl<'a> std::ops::Deref for FloatingIpManager<'a> {
    type Target = ResourceManager<'a>;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}
