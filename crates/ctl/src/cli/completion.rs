use std::collections::BTreeSet;

use anyhow::Result;
use clap::{Command, CommandFactory, Parser};

use crate::cli::ControlCommand;

#[derive(Parser)]
#[command(about = "Print all commands and options for bash completion")]
pub struct BashCompletionCommand {}

fn collect(command: &Command, words: &mut BTreeSet<String>) {
    for arg in command.get_arguments() {
        if let Some(long) = arg.get_long() {
            words.insert(format!("--{}", long));
        }
        if let Some(short) = arg.get_short() {
            words.insert(format!("-{}", short));
        }
    }
    for subcommand in command.get_subcommands() {
        words.insert(subcommand.get_name().to_string());
        collect(subcommand, words);
    }
}

/// Every subcommand name and option flag of the tool, sorted.
pub fn completion_words() -> Vec<String> {
    let mut command = ControlCommand::command();
    command.build();
    let mut words = BTreeSet::new();
    collect(&command, &mut words);
    words.into_iter().collect()
}

impl BashCompletionCommand {
    pub fn run(self) -> Result<()> {
        println!("{}", completion_words().join(" "));
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_completion_words() {
        let words = completion_words();
        for expected in [
            "lease",
            "host",
            "floatingip",
            "bash-completion",
            "reallocate",
            "capability",
            "--physical-reservation",
            "--prolong-for",
            "--os-reservation-url",
            "--sort-by",
            "-v",
        ] {
            assert!(words.iter().any(|x| x == expected), "missing {}", expected);
        }
    }
}
