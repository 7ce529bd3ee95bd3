use anyhow::Result;
use blazar::ResourceKind;
use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::{
    resource::{AllocationListCommand, AllocationShowCommand},
    ShellContext,
};

/// Resource types that carry allocations.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocationKind {
    Host,
    Network,
    Device,
}

impl From<AllocationKind> for ResourceKind {
    fn from(kind: AllocationKind) -> Self {
        match kind {
            AllocationKind::Host => ResourceKind::Host,
            AllocationKind::Network => ResourceKind::Network,
            AllocationKind::Device => ResourceKind::Device,
        }
    }
}

#[derive(Parser)]
#[command(about = "Inspect allocations of any resource type")]
pub struct AllocationCommand {
    #[command(subcommand)]
    subcommand: AllocationCommands,
}

#[derive(Parser)]
#[command(about = "List allocations for all resources of a type")]
pub struct AllocationKindListCommand {
    #[arg(value_enum, help = "Resource type to list allocations for")]
    resource_type: AllocationKind,

    #[command(flatten)]
    list: AllocationListCommand,
}

#[derive(Parser)]
#[command(about = "Show allocations of a resource identified by type and ID")]
pub struct AllocationKindShowCommand {
    #[arg(value_enum, help = "Resource type of the resource")]
    resource_type: AllocationKind,

    #[command(flatten)]
    show: AllocationShowCommand,
}

#[derive(Subcommand)]
pub enum AllocationCommands {
    List(AllocationKindListCommand),
    Show(AllocationKindShowCommand),
}

impl AllocationCommand {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        match self.subcommand {
            AllocationCommands::List(list) => {
                list.list.run(context, list.resource_type.into()).await
            }

            AllocationCommands::Show(show) => {
                show.show.run(context, show.resource_type.into()).await
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Parser)]
    struct Wrapper {
        #[command(subcommand)]
        command: AllocationCommands,
    }

    #[test]
    fn test_resource_types() {
        let parsed =
            Wrapper::try_parse_from(["allocation", "list", "network", "--lease-id", "l1"]).unwrap();
        let AllocationCommands::List(list) = parsed.command else {
            panic!("expected list");
        };
        assert_eq!(ResourceKind::from(list.resource_type), ResourceKind::Network);

        let parsed = Wrapper::try_parse_from(["allocation", "show", "host", "compute-1"]).unwrap();
        assert!(matches!(parsed.command, AllocationCommands::Show(_)));

        assert!(Wrapper::try_parse_from(["allocation", "list", "lease"]).is_err());
    }
}
