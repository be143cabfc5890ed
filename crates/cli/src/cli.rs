use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands::{generate_command, list_command};
use crate::generators::Generator;

#[derive(Parser, Debug)]
#[command(name = "strz")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Working directory (defaults to the current directory)
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Read answers from a JSON file instead of prompting
    #[arg(long, global = true, value_name = "FILE")]
    pub answers: Option<PathBuf>,

    /// Print the planned actions without touching any file
    #[arg(short, long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new workspace
    Init,
    /// Add a person
    #[command(visible_alias = "p")]
    Person,
    /// Add an internal software system
    #[command(visible_alias = "s")]
    System,
    /// Add an external software system
    ExternalSystem,
    /// Add a container to a software system
    #[command(visible_alias = "c")]
    Container,
    /// Add a component to a container
    Component,
    /// Add relationships from an existing element
    #[command(visible_alias = "r")]
    Relationship,
    /// Add a view
    View,
    /// Add an archetype preset
    Archetype,
    /// List the elements of the compiled workspace
    #[command(visible_alias = "ls")]
    List {
        /// Include containers
        #[arg(long)]
        containers: bool,

        /// Include components
        #[arg(long)]
        components: bool,

        /// Include deployment nodes
        #[arg(long)]
        deployment_nodes: bool,
    },
}

impl Commands {
    /// Execute the command
    pub fn execute(self, global: &GlobalArgs) -> Result<()> {
        match self {
            Commands::Init => generate_command(Generator::Init, global),
            Commands::Person => generate_command(Generator::Person, global),
            Commands::System => generate_command(Generator::System, global),
            Commands::ExternalSystem => generate_command(Generator::ExternalSystem, global),
            Commands::Container => generate_command(Generator::Container, global),
            Commands::Component => generate_command(Generator::Component, global),
            Commands::Relationship => generate_command(Generator::Relationship, global),
            Commands::View => generate_command(Generator::View, global),
            Commands::Archetype => generate_command(Generator::Archetype, global),
            Commands::List {
                containers,
                components,
                deployment_nodes,
            } => list_command(global, containers, components, deployment_nodes),
        }
    }
}
