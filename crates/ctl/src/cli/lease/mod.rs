use anyhow::Result;
use blazar::ResourceKind;
use clap::{Parser, Subcommand};

use crate::cli::{
    lease::{create::LeaseCreateCommand, update::LeaseUpdateCommand},
    resource::{ResourceDeleteCommand, ResourceListCommand, ResourceShowCommand},
    ShellContext,
};

pub mod create;
pub mod update;

#[derive(Parser)]
#[command(about = "Manage leases")]
pub struct LeaseCommand {
    #[command(subcommand)]
    subcommand: LeaseCommands,
}

impl LeaseCommand {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        self.subcommand.run(context).await
    }
}

#[derive(Subcommand)]
pub enum LeaseCommands {
    #[command(about = "Print a list of leases")]
    List(ResourceListCommand),
    #[command(about = "Show lease details")]
    Show(ResourceShowCommand),
    Create(LeaseCreateCommand),
    Update(LeaseUpdateCommand),
    #[command(about = "Delete a lease")]
    Delete(ResourceDeleteCommand),
}

impl LeaseCommands {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        let kind = ResourceKind::Lease;
        match self {
            LeaseCommands::List(list) => list.run(context, kind).await,

            LeaseCommands::Show(show) => show.run(context, kind).await,

            LeaseCommands::Create(create) => create.run(context).await,

            LeaseCommands::Update(update) => update.run(context).await,

            LeaseCommands::Delete(delete) => delete.run(context, kind).await,
        }
    }
}
