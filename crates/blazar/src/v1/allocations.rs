use serde_json::Value;

use crate::{
    client::RequestManager, error::Result, resource::ResourceKind,
    v1::resource::ResourceManager, Record,
};

/// Allocation queries addressed by resource kind rather than by manager.
pub struct AllocationManager<'a> {
    request: &'a RequestManager,
}

impl<'a> AllocationManager<'a> {
    pub fn new(request: &'a RequestManager) -> AllocationManager<'a> {
        AllocationManager { request }
    }

    pub async fn get(&self, kind: ResourceKind, id: &str) -> Result<Record> {
        ResourceManager::new(self.request, kind)
            .get_allocation(id)
            .await
    }

    pub async fn list(&self, kind: ResourceKind, sort_by: Option<&str>) -> Result<Vec<Record>> {
        ResourceManager::new(self.request, kind)
            .list_allocations(sort_by)
            .await
    }
}

/// Keeps the reservations of `allocation` that belong to the given lease
/// and reservation. A filter left as `None` matches everything.
pub fn filter_reservations(
    allocation: &mut Record,
    lease_id: Option<&str>,
    reservation_id: Option<&str>,
) {
    let Some(Value::Array(reservations)) = allocation.get_mut("reservations") else {
        return;
    };
    reservations.retain(|reservation| {
        let field = |key: &str| reservation.get(key).and_then(Value::as_str);
        lease_id.map_or(true, |x| field("lease_id") == Some(x))
            && reservation_id.map_or(true, |x| field("id") == Some(x))
    });
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn allocation() -> Record {
        json!({
            "resource_id": "101",
            "reservations": [
                {"id": "r1", "lease_id": "l1"},
                {"id": "r2", "lease_id": "l1"},
                {"id": "r3", "lease_id": "l2"},
            ],
        })
        .as_object()
        .unwrap()
        .clone()
    }

    fn ids(allocation: &Record) -> Vec<&str> {
        allocation["reservations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|x| x["id"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_filter_by_lease() {
        let mut allocation = allocation();
        filter_reservations(&mut allocation, Some("l1"), None);
        assert_eq!(ids(&allocation), vec!["r1", "r2"]);
    }

    #[test]
    fn test_filter_by_lease_and_reservation() {
        let mut allocation = allocation();
        filter_reservations(&mut allocation, Some("l1"), Some("r2"));
        assert_eq!(ids(&allocation), vec!["r2"]);

        let mut allocation = self::allocation();
        filter_reservations(&mut allocation, Some("l2"), Some("r2"));
        assert!(ids(&allocation).is_empty());
    }

    #[test]
    fn test_no_filters() {
        let mut allocation = allocation();
        filter_reservations(&mut allocation, None, None);
        assert_eq!(ids(&allocation), vec!["r1", "r2", "r3"]);
    }
}
