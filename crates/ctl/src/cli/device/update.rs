use anyhow::Result;
use blazar::{params::parse_extra_capabilities, Record, ResourceKind};
use clap::Parser;
use serde_json::Value;

use crate::cli::{resource::send_update, ShellContext};

#[derive(Parser)]
#[command(about = "Update attributes of a device")]
pub struct DeviceUpdateCommand {
    #[arg(help = "ID or name of the device to update")]
    id: String,

    #[arg(long, help = "Type of the device: container, vm or shell")]
    device_type: Option<String>,

    #[arg(long, help = "Driver of the device")]
    device_driver: Option<String>,

    #[arg(
        long = "extra",
        value_name = "KEY=VALUE",
        help = "Extra capability key/value pair to update, can be repeated"
    )]
    extras: Vec<String>,
}

impl DeviceUpdateCommand {
    pub fn body(&self) -> Record {
        let mut values = Record::new();
        for (key, value) in [
            ("device_type", &self.device_type),
            ("device_driver", &self.device_driver),
        ] {
            if let Some(value) = value.as_ref().filter(|x| !x.is_empty()) {
                values.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        if !self.extras.is_empty() {
            let extras = parse_extra_capabilities(&self.extras)
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            values.insert("values".to_string(), Value::Object(extras));
        }
        values
    }

    pub async fn run(self, context: &ShellContext) -> Result<()> {
        let values = self.body();
        send_update(context, ResourceKind::Device, &self.id, values).await
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_update_body() {
        let command = DeviceUpdateCommand::try_parse_from([
            "update",
            "rpi-1",
            "--device-type",
            "shell",
            "--extra",
            "gpio=true",
        ])
        .unwrap();
        assert_eq!(
            Value::Object(command.body()),
            json!({"device_type": "shell", "values": {"gpio": "true"}})
        );
    }
}
