use anyhow::Result;
use blazar::{params::parse_extra_capabilities, v1::networks::NetworkCreate};
use clap::Parser;

use crate::cli::{list::ShowArgs, ShellContext};

#[derive(Parser)]
#[command(about = "Add a network segment to the reservation pool")]
pub struct NetworkCreateCommand {
    #[arg(
        long,
        help = "Type of physical mechanism of the segment, for example flat, geneve, gre, local, vlan or vxlan"
    )]
    network_type: Option<String>,

    #[arg(
        long,
        help = "Name of the physical network of the segment, required for VLAN segments"
    )]
    physical_network: Option<String>,

    #[arg(
        long = "segment",
        help = "VLAN ID for VLAN segments or tunnel ID for GENEVE, GRE and VXLAN segments"
    )]
    segment_id: Option<String>,

    #[arg(
        long = "extra",
        value_name = "KEY=VALUE",
        help = "Extra capability key/value pair to add for the segment, can be repeated"
    )]
    extras: Vec<String>,

    #[command(flatten)]
    show: ShowArgs,
}

impl NetworkCreateCommand {
    pub fn network(&self) -> NetworkCreate {
        NetworkCreate {
            network_type: self.network_type.clone(),
            physical_network: self.physical_network.clone(),
            segment_id: self.segment_id.clone(),
            extras: parse_extra_capabilities(&self.extras),
        }
    }

    pub async fn run(self, context: &ShellContext) -> Result<()> {
        let network = self.network();
        // validate before touching the client so bad arguments fail offline
        network.to_body()?;
        let client = context.client()?;
        let created = client.networks().create(&network).await?;
        self.show.print_with("Created a new network:", &created)
    }
}
