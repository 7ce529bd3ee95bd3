use anyhow::Result;
use blazar::ResourceKind;
use clap::{Parser, Subcommand};

use crate::cli::{
    list::ShowArgs,
    resource::{ResourceDeleteCommand, ResourceListCommand, ResourceShowCommand},
    ShellContext,
};

#[derive(Parser)]
#[command(about = "Manage the floating IPs available for reservation")]
pub struct FloatingIpCommand {
    #[command(subcommand)]
    subcommand: FloatingIpCommands,
}

impl FloatingIpCommand {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        self.subcommand.run(context).await
    }
}

#[derive(Parser)]
#[command(about = "Add a floating IP to the reservation pool")]
pub struct FloatingIpCreateCommand {
    #[arg(help = "External network ID to which the floating IP belongs")]
    network_id: String,

    #[arg(help = "Floating IP address to add")]
    floating_ip_address: String,

    #[command(flatten)]
    show: ShowArgs,
}

impl FloatingIpCreateCommand {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        let client = context.client()?;
        let floatingip = client
            .floatingips()
            .create(&self.network_id, &self.floating_ip_address)
            .await?;
        self.show.print_with("Created a new floatingip:", &floatingip)
    }
}

#[derive(Subcommand)]
pub enum FloatingIpCommands {
    #[command(about = "Print a list of floating IPs")]
    List(ResourceListCommand),
    #[command(about = "Show floating IP details")]
    Show(ResourceShowCommand),
    Create(FloatingIpCreateCommand),
    #[command(about = "Delete a floating IP")]
    Delete(ResourceDeleteCommand),
}

impl FloatingIpCommands {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        let kind = ResourceKind::FloatingIp;
        match self {
            FloatingIpCommands::List(list) => list.run(context, kind).await,

            FloatingIpCommands::Show(show) => show.run(context, kind).await,

            FloatingIpCommands::Create(create) => create.run(context).await,

            FloatingIpCommands::Delete(delete) => delete.run(context, kind).await,
        }
    }
}
