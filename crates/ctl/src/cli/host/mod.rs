use anyhow::Result;
use blazar::ResourceKind;
use clap::{Parser, Subcommand};

use crate::cli::{
    host::create::HostCreateCommand,
    resource::{
        CapabilityCommand, ExtrasUpdateCommand, ReallocateCommand, ResourceAllocationCommand,
        ResourceDeleteCommand, ResourceListCommand, ResourceShowCommand, UnsetCommand,
    },
    ShellContext,
};

pub mod create;

#[derive(Parser)]
#[command(about = "Manage the compute hosts available for reservation")]
pub struct HostCommand {
    #[command(subcommand)]
    subcommand: HostCommands,
}

impl HostCommand {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        self.subcommand.run(context).await
    }
}

#[derive(Subcommand)]
pub enum HostCommands {
    #[command(about = "Print a list of hosts")]
    List(ResourceListCommand),
    #[command(about = "Show host details")]
    Show(ResourceShowCommand),
    Create(HostCreateCommand),
    #[command(about = "Update attributes of a host")]
    Update(ExtrasUpdateCommand),
    #[command(about = "Unset attributes of a host")]
    Unset(UnsetCommand),
    #[command(about = "Delete a host")]
    Delete(ResourceDeleteCommand),
    #[command(about = "Reallocate a host from its current leases")]
    Reallocate(ReallocateCommand),
    #[command(about = "Inspect host allocations")]
    Allocation(ResourceAllocationCommand),
    #[command(about = "Manage host extra capabilities")]
    Capability(CapabilityCommand),
}

impl HostCommands {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        let kind = ResourceKind::Host;
        match self {
            HostCommands::List(list) => list.run(context, kind).await,

            HostCommands::Show(show) => show.run(context, kind).await,

            HostCommands::Create(create) => create.run(context).await,

            HostCommands::Update(update) => update.run(context, kind).await,

            HostCommands::Unset(unset) => unset.run(context, kind).await,

            HostCommands::Delete(delete) => delete.run(context, kind).await,

            HostCommands::Reallocate(reallocate) => reallocate.run(context, kind).await,

            HostCommands::Allocation(allocation) => allocation.run(context, kind).await,

            HostCommands::Capability(capability) => capability.run(context, kind).await,
        }
    }
}
