use log::debug;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    client::RequestManager,
    error::{Error, Result},
    resolve::find_resource_id,
    resource::ResourceKind,
    v1::{sort_records, take_record, take_records},
    Record,
};

/// Body of a reallocation request. Only one of the two selectors is sent,
/// the reservation id taking precedence over the lease id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReallocateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<String>,
}

impl ReallocateRequest {
    pub fn new(lease_id: Option<String>, reservation_id: Option<String>) -> ReallocateRequest {
        if reservation_id.is_some() {
            ReallocateRequest {
                lease_id: None,
                reservation_id,
            }
        } else {
            ReallocateRequest {
                lease_id,
                reservation_id: None,
            }
        }
    }
}

/// Operations shared by every resource collection of the service.
pub struct ResourceManager<'a> {
    request: &'a RequestManager,
    kind: ResourceKind,
}

impl<'a> ResourceManager<'a> {
    pub fn new(request: &'a RequestManager, kind: ResourceKind) -> ResourceManager<'a> {
        ResourceManager { request, kind }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.kind.path(), id)
    }

    pub async fn list(&self, sort_by: Option<&str>) -> Result<Vec<Record>> {
        let body = self.request.get(self.kind.path()).await?;
        let mut records = take_records(body, self.kind.plural())?;
        if let Some(key) = sort_by {
            sort_records(&mut records, key);
        }
        Ok(records)
    }

    pub async fn get(&self, id: &str) -> Result<Record> {
        let body = self.request.get(&self.item_path(id)).await?;
        take_record(body, self.kind.singular())
    }

    pub async fn create<B: Serialize + ?Sized>(&self, values: &B) -> Result<Record> {
        let body = self.request.post(self.kind.path(), values).await?;
        take_record(body, self.kind.singular())
    }

    /// Sends `values` as the new attributes of the record. Nothing is sent
    /// when there is nothing to update.
    pub async fn update(&self, id: &str, values: &Record) -> Result<Option<Record>> {
        if values.is_empty() {
            debug!("no values to update passed for {} {}", self.kind, id);
            return Ok(None);
        }
        let body = self.request.put(&self.item_path(id), values).await?;
        take_record(body, self.kind.singular()).map(Some)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.request.delete(&self.item_path(id)).await?;
        Ok(())
    }

    /// Turns a name or an id into an id, listing the collection only when
    /// the token does not already look like an id.
    pub async fn resolve(&self, token: &str) -> Result<String> {
        if !self.kind.allow_names() || self.kind.id_pattern().is_match(token) {
            return Ok(token.to_string());
        }
        let records = self.list(None).await?;
        find_resource_id(
            &records,
            self.kind.name_key(),
            self.kind.id_pattern(),
            token,
        )
    }

    fn ensure_allocations(&self) -> Result<()> {
        if self.kind.supports_allocations() {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "{} resources do not have allocations",
                self.kind
            )))
        }
    }

    fn ensure_capabilities(&self) -> Result<()> {
        if self.kind.supports_capabilities() {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "{} resources do not have capabilities",
                self.kind
            )))
        }
    }

    pub async fn get_allocation(&self, id: &str) -> Result<Record> {
        self.ensure_allocations()?;
        let body = self
            .request
            .get(&format!("{}/allocation", self.item_path(id)))
            .await?;
        take_record(body, "allocation")
    }

    pub async fn list_allocations(&self, sort_by: Option<&str>) -> Result<Vec<Record>> {
        self.ensure_allocations()?;
        let body = self
            .request
            .get(&format!("{}/allocations", self.kind.path()))
            .await?;
        let mut allocations = take_records(body, "allocations")?;
        if let Some(key) = sort_by {
            sort_records(&mut allocations, key);
        }
        Ok(allocations)
    }

    pub async fn reallocate(&self, id: &str, request: &ReallocateRequest) -> Result<Record> {
        self.ensure_allocations()?;
        let body = self
            .request
            .put(&format!("{}/allocation", self.item_path(id)), request)
            .await?;
        take_record(body, "allocation")
    }

    /// Lists the extra capabilities known for the collection. With `detail`
    /// the `values` field is reported as `capability_values`.
    pub async fn list_capabilities(
        &self,
        detail: bool,
        all: bool,
        sort_by: Option<&str>,
    ) -> Result<Vec<Record>> {
        self.ensure_capabilities()?;
        let mut path = format!("{}/properties", self.kind.path());
        let mut query = Vec::new();
        if detail {
            query.push("detail=True");
        }
        if all {
            query.push("all=True");
        }
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query.join("&"));
        }

        let body = self.request.get(&path).await?;
        let mut properties = take_records(body, "resource_properties")?;
        if detail {
            for property in properties.iter_mut() {
                if let Some(values) = property.remove("values") {
                    property.insert("capability_values".to_string(), values);
                }
            }
        }
        if let Some(key) = sort_by {
            sort_records(&mut properties, key);
        }
        Ok(properties)
    }

    pub async fn get_capability(&self, name: &str) -> Result<Record> {
        self.list_capabilities(true, false, None)
            .await?
            .into_iter()
            .find(|x| x.get("property").and_then(Value::as_str) == Some(name))
            .ok_or_else(|| Error::ResourcePropertyNotFound(name.to_string()))
    }

    pub async fn set_capability(&self, name: &str, private: bool) -> Result<Record> {
        self.ensure_capabilities()?;
        let body = self
            .request
            .patch(
                &format!("{}/properties/{}", self.kind.path(), name),
                &json!({ "private": private }),
            )
            .await?;
        take_record(body, "resource_property")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reallocate_prefers_reservation() {
        let request = ReallocateRequest::new(Some("lease".into()), Some("reservation".into()));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"reservation_id": "reservation"})
        );
        let request = ReallocateRequest::new(Some("lease".into()), None);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"lease_id": "lease"})
        );
        let request = ReallocateRequest::new(None, None);
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({}));
    }
}
