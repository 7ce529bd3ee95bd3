use std::fmt::Display;

use crate::resolve::IdPattern;

/// The resource collections exposed by the reservation service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Lease,
    Host,
    Network,
    Device,
    FloatingIp,
}

impl ResourceKind {
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Lease => "/leases",
            ResourceKind::Host => "/os-hosts",
            ResourceKind::Network => "/networks",
            ResourceKind::Device => "/devices",
            ResourceKind::FloatingIp => "/floatingips",
        }
    }

    /// Key wrapping a single record in response bodies.
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Lease => "lease",
            ResourceKind::Host => "host",
            ResourceKind::Network => "network",
            ResourceKind::Device => "device",
            ResourceKind::FloatingIp => "floatingip",
        }
    }

    /// Key wrapping a list of records in response bodies.
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Lease => "leases",
            ResourceKind::Host => "hosts",
            ResourceKind::Network => "networks",
            ResourceKind::Device => "devices",
            ResourceKind::FloatingIp => "floatingips",
        }
    }

    pub fn name_key(&self) -> &'static str {
        match self {
            ResourceKind::Host => "hypervisor_hostname",
            _ => "name",
        }
    }

    pub fn id_pattern(&self) -> IdPattern {
        match self {
            ResourceKind::Host => IdPattern::HostId,
            _ => IdPattern::Uuid,
        }
    }

    pub fn allow_names(&self) -> bool {
        !matches!(self, ResourceKind::FloatingIp)
    }

    pub fn list_columns(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::Lease => &["id", "name", "start_date", "end_date"],
            ResourceKind::Host => &[
                "id",
                "hypervisor_hostname",
                "vcpus",
                "memory_mb",
                "local_gb",
            ],
            ResourceKind::Network => &["id", "network_type", "physical_network", "segment_id"],
            ResourceKind::Device => &["id", "name", "device_type", "device_driver"],
            ResourceKind::FloatingIp => &["id", "floating_ip_address", "floating_network_id"],
        }
    }

    pub fn default_sort(&self) -> &'static str {
        match self {
            ResourceKind::Lease => "name",
            ResourceKind::Host => "hypervisor_hostname",
            ResourceKind::Device => "name",
            ResourceKind::Network | ResourceKind::FloatingIp => "id",
        }
    }

    pub fn supports_allocations(&self) -> bool {
        matches!(
            self,
            ResourceKind::Host | ResourceKind::Network | ResourceKind::Device
        )
    }

    pub fn supports_capabilities(&self) -> bool {
        matches!(
            self,
            ResourceKind::Host | ResourceKind::Network | ResourceKind::Device
        )
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.singular())
    }
}

pub const ALLOCATION_LIST_COLUMNS: &[&str] = &["resource_id", "reservations"];
pub const CAPABILITY_LIST_COLUMNS: &[&str] = &["property", "private", "capability_values"];
