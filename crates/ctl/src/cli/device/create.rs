use anyhow::Result;
use blazar::{
    params::parse_extra_capabilities,
    v1::devices::{DEFAULT_DEVICE_DRIVER, DEFAULT_DEVICE_TYPE},
};
use clap::Parser;

use crate::cli::{list::ShowArgs, ShellContext};

#[derive(Parser)]
#[command(about = "Add a device to the reservation pool")]
pub struct DeviceCreateCommand {
    #[arg(help = "Name of the device to add")]
    name: String,

    #[arg(
        long,
        default_value = DEFAULT_DEVICE_TYPE,
        help = "Type of the device: container, vm or shell"
    )]
    device_type: String,

    #[arg(long, default_value = DEFAULT_DEVICE_DRIVER, help = "Driver of the device")]
    device_driver: String,

    #[arg(
        long = "extra",
        value_name = "KEY=VALUE",
        help = "Extra capability key/value pair to add for the device, can be repeated"
    )]
    extras: Vec<String>,

    #[command(flatten)]
    show: ShowArgs,
}

impl DeviceCreateCommand {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        let client = context.client()?;
        let extras = parse_extra_capabilities(&self.extras);
        let device = client
            .devices()
            .create(&self.name, &self.device_type, &self.device_driver, &extras)
            .await?;
        self.show.print_with("Created a new device:", &device)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let command = DeviceCreateCommand::try_parse_from(["create", "rpi-1"]).unwrap();
        assert_eq!(command.device_type, "container");
        assert_eq!(command.device_driver, "zun");
        assert!(command.extras.is_empty());
    }
}
