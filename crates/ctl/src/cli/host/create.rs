use anyhow::Result;
use blazar::params::parse_extra_capabilities;
use clap::Parser;

use crate::cli::{list::ShowArgs, ShellContext};

#[derive(Parser)]
#[command(about = "Add a compute host to the reservation pool")]
pub struct HostCreateCommand {
    #[arg(help = "Name of the compute host to add")]
    name: String,

    #[arg(
        long = "extra",
        value_name = "KEY=VALUE",
        help = "Extra capability key/value pair to add for the host, can be repeated"
    )]
    extras: Vec<String>,

    #[command(flatten)]
    show: ShowArgs,
}

impl HostCreateCommand {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        let client = context.client()?;
        let extras = parse_extra_capabilities(&self.extras);
        let host = client.hosts().create(&self.name, &extras).await?;
        self.show.print_with("Created a new host:", &host)
    }
}
