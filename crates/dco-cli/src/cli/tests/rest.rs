//! Tests for plan, config and completions subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_plan() {
    match parse(&["dco", "plan", "10485760", "--chunk-size", "100000"]) {
        CliCommand::Plan { size, dispatch } => {
            assert_eq!(size, 10_485_760);
            assert_eq!(dispatch.chunk_size, Some(100_000));
        }
        _ => panic!("expected Plan"),
    }
}

#[test]
fn cli_parse_config() {
    assert!(matches!(parse(&["dco", "config"]), CliCommand::Config));
}

#[test]
fn cli_parse_completions() {
    match parse(&["dco", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_unknown_subcommand_fails() {
    assert!(Cli::try_parse_from(["dco", "download"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
