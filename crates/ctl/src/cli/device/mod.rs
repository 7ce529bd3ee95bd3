use anyhow::Result;
use blazar::ResourceKind;
use clap::{Parser, Subcommand};

use crate::cli::{
    device::{create::DeviceCreateCommand, update::DeviceUpdateCommand},
    resource::{
        CapabilityCommand, ReallocateCommand, ResourceAllocationCommand, ResourceDeleteCommand,
        ResourceListCommand, ResourceShowCommand, UnsetCommand,
    },
    ShellContext,
};

pub mod create;
pub mod update;

#[derive(Parser)]
#[command(about = "Manage the devices available for reservation")]
pub struct DeviceCommand {
    #[command(subcommand)]
    subcommand: DeviceCommands,
}

impl DeviceCommand {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        self.subcommand.run(context).await
    }
}

#[derive(Subcommand)]
pub enum DeviceCommands {
    #[command(about = "Print a list of devices")]
    List(ResourceListCommand),
    #[command(about = "Show device details")]
    Show(ResourceShowCommand),
    Create(DeviceCreateCommand),
    Update(DeviceUpdateCommand),
    #[command(about = "Unset attributes of a device")]
    Unset(UnsetCommand),
    #[command(about = "Delete a device")]
    Delete(ResourceDeleteCommand),
    #[command(about = "Reallocate a device from its current leases")]
    Reallocate(ReallocateCommand),
    #[command(about = "Inspect device allocations")]
    Allocation(ResourceAllocationCommand),
    #[command(about = "Manage device extra capabilities")]
    Capability(CapabilityCommand),
}

impl DeviceCommands {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        let kind = ResourceKind::Device;
        match self {
            DeviceCommands::List(list) => list.run(context, kind).await,

            DeviceCommands::Show(show) => show.run(context, kind).await,

            DeviceCommands::Create(create) => create.run(context).await,

            DeviceCommands::Update(update) => update.run(context).await,

            DeviceCommands::Unset(unset) => unset.run(context, kind).await,

            DeviceCommands::Delete(delete) => delete.run(context, kind).await,

            DeviceCommands::Reallocate(reallocate) => reallocate.run(context, kind).await,

            DeviceCommands::Allocation(allocation) => allocation.run(context, kind).await,

            DeviceCommands::Capability(capability) => capability.run(context, kind).await,
        }
    }
}
