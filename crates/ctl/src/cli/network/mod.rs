use anyhow::Result;
use blazar::ResourceKind;
use clap::{Parser, Subcommand};

use crate::cli::{
    network::create::NetworkCreateCommand,
    resource::{
        CapabilityCommand, ExtrasUpdateCommand, ResourceAllocationCommand, ResourceDeleteCommand,
        ResourceListCommand, ResourceShowCommand, UnsetCommand,
    },
    ShellContext,
};

pub mod create;

#[derive(Parser)]
#[command(about = "Manage the network segments available for reservation")]
pub struct NetworkCommand {
    #[command(subcommand)]
    subcommand: NetworkCommands,
}

impl NetworkCommand {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        self.subcommand.run(context).await
    }
}

#[derive(Subcommand)]
pub enum NetworkCommands {
    #[command(about = "Print a list of network segments")]
    List(ResourceListCommand),
    #[command(about = "Show network segment details")]
    Show(ResourceShowCommand),
    Create(NetworkCreateCommand),
    #[command(about = "Update attributes of a network segment")]
    Update(ExtrasUpdateCommand),
    #[command(about = "Unset attributes of a network segment")]
    Unset(UnsetCommand),
    #[command(about = "Delete a network segment")]
    Delete(ResourceDeleteCommand),
    #[command(about = "Inspect network segment allocations")]
    Allocation(ResourceAllocationCommand),
    #[command(about = "Manage network segment extra capabilities")]
    Capability(CapabilityCommand),
}

impl NetworkCommands {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        let kind = ResourceKind::Network;
        match self {
            NetworkCommands::List(list) => list.run(context, kind).await,

            NetworkCommands::Show(show) => show.run(context, kind).await,

            NetworkCommands::Create(create) => create.run(context).await,

            NetworkCommands::Update(update) => update.run(context, kind).await,

            NetworkCommands::Unset(unset) => unset.run(context, kind).await,

            NetworkCommands::Delete(delete) => delete.run(context, kind).await,

            NetworkCommands::Allocation(allocation) => allocation.run(context, kind).await,

            NetworkCommands::Capability(capability) => capability.run(context, kind).await,
        }
    }
}
