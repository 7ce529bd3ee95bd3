use anyhow::Result;
use blazar::{
    params::parse_extra_capabilities,
    resource::{ResourceKind, ALLOCATION_LIST_COLUMNS, CAPABILITY_LIST_COLUMNS},
    v1::{allocations::filter_reservations, resource::ReallocateRequest},
    Record,
};
use clap::{Args, Parser, Subcommand};
use log::debug;
use serde_json::Value;

use crate::cli::{
    list::{ListArgs, ShowArgs},
    ShellContext,
};

#[derive(Parser)]
#[command(about = "List resources")]
pub struct ResourceListCommand {
    #[command(flatten)]
    list: ListArgs,
}

impl ResourceListCommand {
    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        let sort_by = self.list.sort_key(kind.default_sort(), kind.list_columns())?;
        let client = context.client()?;
        let records = client.resource(kind).list(Some(&sort_by)).await?;
        self.list.print(&records, kind.list_columns())
    }
}

#[derive(Parser)]
#[command(about = "Show resource details")]
pub struct ResourceShowCommand {
    #[arg(help = "ID or name of the resource to look up")]
    id: String,

    #[command(flatten)]
    show: ShowArgs,
}

impl ResourceShowCommand {
    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        let client = context.client()?;
        let manager = client.resource(kind);
        let id = manager.resolve(&self.id).await?;
        let record = manager.get(&id).await?;
        self.show.print(&record)
    }
}

#[derive(Parser)]
#[command(about = "Delete a resource")]
pub struct ResourceDeleteCommand {
    #[arg(help = "ID or name of the resource to delete")]
    id: String,
}

impl ResourceDeleteCommand {
    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        let client = context.client()?;
        let manager = client.resource(kind);
        let id = manager.resolve(&self.id).await?;
        manager.delete(&id).await?;
        println!("Deleted {}: {}", kind, self.id);
        Ok(())
    }
}

/// Sends a resolved update and reports it the same way for every kind.
pub async fn send_update(
    context: &ShellContext,
    kind: ResourceKind,
    token: &str,
    values: Record,
) -> Result<()> {
    let client = context.client()?;
    let manager = client.resource(kind);
    let id = manager.resolve(token).await?;
    if manager.update(&id, &values).await?.is_none() {
        debug!("nothing to update on {} {}", kind, token);
    }
    println!("Updated {}: {}", kind, token);
    Ok(())
}

fn extras_values(extras: impl IntoIterator<Item = (String, Value)>) -> Record {
    let extras = extras.into_iter().collect::<Record>();
    let mut values = Record::new();
    if !extras.is_empty() {
        values.insert("values".to_string(), Value::Object(extras));
    }
    values
}

#[derive(Parser)]
#[command(about = "Update extra capabilities of a resource")]
pub struct ExtrasUpdateCommand {
    #[arg(help = "ID or name of the resource to update")]
    id: String,

    #[arg(
        long = "extra",
        value_name = "KEY=VALUE",
        help = "Extra capability key/value pair to update, can be repeated"
    )]
    extras: Vec<String>,
}

impl ExtrasUpdateCommand {
    pub fn body(&self) -> Record {
        extras_values(
            parse_extra_capabilities(&self.extras)
                .into_iter()
                .map(|(key, value)| (key, Value::String(value))),
        )
    }

    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        let values = self.body();
        send_update(context, kind, &self.id, values).await
    }
}

#[derive(Parser)]
#[command(about = "Unset extra capabilities of a resource")]
pub struct UnsetCommand {
    #[arg(help = "ID or name of the resource to update")]
    id: String,

    #[arg(
        long = "extra",
        value_name = "KEY",
        help = "Extra capability key to unset, can be repeated"
    )]
    extras: Vec<String>,
}

impl UnsetCommand {
    pub fn body(&self) -> Record {
        extras_values(self.extras.iter().map(|key| (key.clone(), Value::Null)))
    }

    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        let values = self.body();
        send_update(context, kind, &self.id, values).await
    }
}

#[derive(Parser)]
#[command(about = "Reallocate a resource from its current leases")]
pub struct ReallocateCommand {
    #[arg(help = "ID or name of the resource to reallocate")]
    id: String,

    #[arg(long, help = "Lease ID to reallocate the resource from")]
    lease_id: Option<String>,

    #[arg(
        long,
        help = "Reservation ID to reallocate the resource from, takes precedence over --lease-id"
    )]
    reservation_id: Option<String>,
}

impl ReallocateCommand {
    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        let client = context.client()?;
        let manager = client.resource(kind);
        let id = manager.resolve(&self.id).await?;
        let request = ReallocateRequest::new(self.lease_id, self.reservation_id);
        manager.reallocate(&id, &request).await?;
        println!("Reallocated {}: {}", kind, self.id);
        Ok(())
    }
}

/// Client-side narrowing of the reservations shown for an allocation.
#[derive(Args, Clone, Debug)]
pub struct ReservationFilter {
    #[arg(long, help = "Show only reservations of this lease")]
    lease_id: Option<String>,

    #[arg(long, help = "Show only the reservation with this ID")]
    reservation_id: Option<String>,
}

impl ReservationFilter {
    pub fn apply(&self, allocation: &mut Record) {
        filter_reservations(
            allocation,
            self.lease_id.as_deref(),
            self.reservation_id.as_deref(),
        );
    }
}

#[derive(Parser)]
#[command(about = "List allocations")]
pub struct AllocationListCommand {
    #[command(flatten)]
    filter: ReservationFilter,

    #[command(flatten)]
    list: ListArgs,
}

impl AllocationListCommand {
    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        let sort_by = self.list.sort_key("resource_id", ALLOCATION_LIST_COLUMNS)?;
        let client = context.client()?;
        let mut allocations = client.allocations().list(kind, Some(&sort_by)).await?;
        for allocation in allocations.iter_mut() {
            self.filter.apply(allocation);
        }
        self.list.print(&allocations, ALLOCATION_LIST_COLUMNS)
    }
}

#[derive(Parser)]
#[command(about = "Show allocation details")]
pub struct AllocationShowCommand {
    #[arg(help = "ID or name of the resource to look up")]
    id: String,

    #[command(flatten)]
    filter: ReservationFilter,

    #[command(flatten)]
    show: ShowArgs,
}

impl AllocationShowCommand {
    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        let client = context.client()?;
        let id = client.resource(kind).resolve(&self.id).await?;
        let mut allocation = client.allocations().get(kind, &id).await?;
        self.filter.apply(&mut allocation);
        self.show.print(&allocation)
    }
}

#[derive(Parser)]
#[command(about = "Manage resource allocations")]
pub struct ResourceAllocationCommand {
    #[command(subcommand)]
    subcommand: ResourceAllocationCommands,
}

#[derive(Subcommand)]
pub enum ResourceAllocationCommands {
    List(AllocationListCommand),
    Show(AllocationShowCommand),
}

impl ResourceAllocationCommand {
    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        match self.subcommand {
            ResourceAllocationCommands::List(list) => list.run(context, kind).await,
            ResourceAllocationCommands::Show(show) => show.run(context, kind).await,
        }
    }
}

#[derive(Parser)]
#[command(about = "List extra capabilities")]
pub struct CapabilityListCommand {
    #[arg(long, help = "Return capabilities with values and attributes")]
    detail: bool,

    #[arg(long, help = "Include capabilities that are not in use")]
    all: bool,

    #[command(flatten)]
    list: ListArgs,
}

impl CapabilityListCommand {
    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        let sort_by = self.list.sort_key("property", CAPABILITY_LIST_COLUMNS)?;
        let client = context.client()?;
        let properties = client
            .resource(kind)
            .list_capabilities(self.detail, self.all, Some(&sort_by))
            .await?;
        self.list.print(&properties, CAPABILITY_LIST_COLUMNS)
    }
}

#[derive(Parser)]
#[command(about = "Show an extra capability")]
pub struct CapabilityShowCommand {
    #[arg(help = "Name of the extra capability")]
    name: String,

    #[command(flatten)]
    show: ShowArgs,
}

impl CapabilityShowCommand {
    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        let client = context.client()?;
        let property = client.resource(kind).get_capability(&self.name).await?;
        self.show.print(&property)
    }
}

#[derive(Parser)]
#[command(about = "Set the visibility of an extra capability")]
pub struct CapabilitySetCommand {
    #[arg(help = "Name of the extra capability to patch")]
    name: String,

    #[arg(long, conflicts_with = "public", help = "Set capability to private")]
    private: bool,

    #[arg(long, help = "Set capability to public")]
    public: bool,
}

impl CapabilitySetCommand {
    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        let client = context.client()?;
        client
            .resource(kind)
            .set_capability(&self.name, self.private)
            .await?;
        println!("Updated {} extra capability: {}", kind, self.name);
        Ok(())
    }
}

#[derive(Parser)]
#[command(about = "Manage extra capabilities")]
pub struct CapabilityCommand {
    #[command(subcommand)]
    subcommand: CapabilityCommands,
}

#[derive(Subcommand)]
pub enum CapabilityCommands {
    List(CapabilityListCommand),
    Show(CapabilityShowCommand),
    Set(CapabilitySetCommand),
}

impl CapabilityCommand {
    pub async fn run(self, context: &ShellContext, kind: ResourceKind) -> Result<()> {
        match self.subcommand {
            CapabilityCommands::List(list) => list.run(context, kind).await,
            CapabilityCommands::Show(show) => show.run(context, kind).await,
            CapabilityCommands::Set(set) => set.run(context, kind).await,
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_extras_update_body() {
        let command = ExtrasUpdateCommand::try_parse_from([
            "update",
            "compute-1",
            "--extra",
            "gpu=a100",
            "--extra",
            "gpu=h100",
            "--extra",
            "rack=r1=b",
        ])
        .unwrap();
        assert_eq!(
            Value::Object(command.body()),
            json!({"values": {"gpu": "h100", "rack": "r1=b"}})
        );

        let command = ExtrasUpdateCommand::try_parse_from(["update", "compute-1"]).unwrap();
        assert!(command.body().is_empty());
    }

    #[test]
    fn test_unset_body() {
        let command = UnsetCommand::try_parse_from([
            "unset",
            "compute-1",
            "--extra",
            "gpu",
            "--extra",
            "rack",
        ])
        .unwrap();
        assert_eq!(
            Value::Object(command.body()),
            json!({"values": {"gpu": null, "rack": null}})
        );
    }

    #[test]
    fn test_capability_set_flags_conflict() {
        assert!(
            CapabilitySetCommand::try_parse_from(["set", "gpu", "--private", "--public"]).is_err()
        );
        let command = CapabilitySetCommand::try_parse_from(["set", "gpu", "--private"]).unwrap();
        assert!(command.private);
    }
}
