// ABOUTME: Module root for specport subcommands.
// ABOUTME: Each command exposes clap arguments and an async execute entry point.

pub mod export_specification;
