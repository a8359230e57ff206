//! Node commands

use clap::{Args, Subcommand};
use graphwire_client::Entity;

use super::print_result;
use crate::output::{format_node, parse_property, NodeView};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct NodeArgs {
    #[command(subcommand)]
    pub command: NodeCommands,
}

#[derive(Subcommand)]
pub enum NodeCommands {
    /// Create a node
    Create {
        /// Properties as key=value (values are parsed as JSON when possible)
        #[arg(short, long = "prop")]
        prop: Vec<String>,
    },
    /// Show a node and its properties
    Get {
        /// Node id
        id: u64,
    },
    /// Set properties on an existing node
    Set {
        /// Node id
        id: u64,
        /// Properties as key=value
        #[arg(short, long = "prop", required = true)]
        prop: Vec<String>,
    },
    /// Delete a node
    Delete {
        /// Node id
        id: u64,
    },
}

pub async fn run(args: &NodeArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let client = &ctx.client;

    match &args.command {
        NodeCommands::Create { prop } => {
            let node = client.make_node();
            for arg in prop {
                let (key, value) = parse_property(arg)?;
                node.set_property(key, value);
            }
            node.save().await?;

            let view = NodeView::new(&node, node.cached_properties());
            print_result(cli, &format_node(&view, cli.output_format()));
        }
        NodeCommands::Get { id } => {
            let Some(node) = client.get_node(*id).await? else {
                anyhow::bail!("Node {} not found", id);
            };
            let view = NodeView::new(&node, node.properties().await?);
            print_result(cli, &format_node(&view, cli.output_format()));
        }
        NodeCommands::Set { id, prop } => {
            let Some(node) = client.get_node(*id).await? else {
                anyhow::bail!("Node {} not found", id);
            };
            for arg in prop {
                let (key, value) = parse_property(arg)?;
                node.set_property(key, value);
            }
            node.save().await?;

            let view = NodeView::new(&node, node.cached_properties());
            print_result(cli, &format_node(&view, cli.output_format()));
        }
        NodeCommands::Delete { id } => {
            let node = client.node_ref(*id)?;
            node.delete().await?;
            print_result(cli, &format!("Deleted node {}", id));
        }
    }

    Ok(())
}
