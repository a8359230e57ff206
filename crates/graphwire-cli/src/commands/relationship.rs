//! Relationship commands

use clap::{Args, Subcommand, ValueEnum};
use graphwire_client::{Entity, UniqueAction};

use super::print_result;
use crate::output::{format_relationship, parse_property, parse_value, RelationshipView};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct RelArgs {
    #[command(subcommand)]
    pub command: RelCommands,
}

#[derive(Subcommand)]
pub enum RelCommands {
    /// Create a relationship between two existing nodes
    Create {
        /// Start node id
        start: u64,
        /// End node id
        end: u64,
        /// Relationship type
        #[arg(short = 't', long = "type")]
        rel_type: String,
        /// Properties as key=value (values are parsed as JSON when possible)
        #[arg(short, long = "prop")]
        prop: Vec<String>,
        /// Create through the type's uniqueness index under this key
        #[arg(long, requires = "unique_value")]
        unique_key: Option<String>,
        /// Value for the unique key (parsed as JSON when possible)
        #[arg(long, requires = "unique_key")]
        unique_value: Option<String>,
        /// What to do when the unique pair already exists [default: get_or_create]
        #[arg(long, value_enum, requires = "unique_key")]
        unique_action: Option<ActionArg>,
    },
    /// Show a relationship
    Get {
        /// Relationship id
        id: u64,
    },
    /// Delete a relationship
    Delete {
        /// Relationship id
        id: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ActionArg {
    #[value(name = "get_or_create", alias = "get-or-create")]
    GetOrCreate,
    #[value(name = "create_or_fail", alias = "create-or-fail")]
    CreateOrFail,
}

impl From<ActionArg> for UniqueAction {
    fn from(action: ActionArg) -> Self {
        match action {
            ActionArg::GetOrCreate => UniqueAction::GetOrCreate,
            ActionArg::CreateOrFail => UniqueAction::CreateOrFail,
        }
    }
}

pub async fn run(args: &RelArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let client = &ctx.client;

    match &args.command {
        RelCommands::Create {
            start,
            end,
            rel_type,
            prop,
            unique_key,
            unique_value,
            unique_action,
        } => {
            let start = client.node_ref(*start)?;
            let end = client.node_ref(*end)?;
            let rel = start.relate_to(&end, rel_type.as_str());
            for arg in prop {
                let (key, value) = parse_property(arg)?;
                rel.set_property(key, value);
            }

            if let (Some(key), Some(value)) = (unique_key, unique_value) {
                rel.set_unique_key(key.as_str());
                rel.set_unique_value(parse_value(value));
                if let Some(action) = unique_action {
                    rel.set_unique_action(UniqueAction::from(*action))?;
                }
            }

            if let Err(err) = rel.save().await {
                if err.is_conflict() {
                    anyhow::bail!(
                        "A {} relationship with {} = {} already exists",
                        rel_type,
                        unique_key.as_deref().unwrap_or("?"),
                        unique_value.as_deref().unwrap_or("?")
                    );
                }
                return Err(err.into());
            }

            print_result(
                cli,
                &format_relationship(&RelationshipView::new(&rel), cli.output_format()),
            );
        }
        RelCommands::Get { id } => {
            let Some(rel) = client.get_relationship(*id).await? else {
                anyhow::bail!("Relationship {} not found", id);
            };
            print_result(
                cli,
                &format_relationship(&RelationshipView::new(&rel), cli.output_format()),
            );
        }
        RelCommands::Delete { id } => {
            let rel = client.relationship_ref(*id)?;
            rel.delete().await?;
            print_result(cli, &format!("Deleted relationship {}", id));
        }
    }

    Ok(())
}
