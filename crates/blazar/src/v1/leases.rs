use log::debug;

use crate::{
    client::RequestManager,
    error::Result,
    lease::{LeaseCreateRequest, LeaseUpdate},
    resource::ResourceKind,
    v1::resource::ResourceManager,
    Record,
};

pub struct LeaseManager<'a> {
    resource: ResourceManager<'a>,
}

impl<'a> LeaseManager<'a> {
    pub fn new(request: &'a RequestManager) -> LeaseManager<'a> {
        LeaseManager {
            resource: ResourceManager::new(request, ResourceKind::Lease),
        }
    }

    pub async fn create(&self, request: &LeaseCreateRequest) -> Result<Record> {
        self.resource.create(request).await
    }

    pub async fn get(&self, id: &str) -> Result<Record> {
        self.resource.get(id).await
    }

    pub async fn list(&self, sort_by: Option<&str>) -> Result<Vec<Record>> {
        self.resource.list(sort_by).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.resource.delete(id).await
    }

    /// Applies `update` to the lease. Relative date shifts need the stored
    /// dates, so the lease is fetched first in that case.
    pub async fn update(&self, id: &str, update: &LeaseUpdate) -> Result<Option<Record>> {
        let current = if update.needs_current_lease() {
            debug!("fetching lease {} to compute its new dates", id);
            Some(self.resource.get(id).await?)
        } else {
            None
        };
        let values = update.to_body(current.as_ref())?;
        self.resource.update(id, &values).await
    }
}

impl<'a> std::ops::Deref for LeaseManager<'a> {
    type Target = ResourceManager<'a>;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}
