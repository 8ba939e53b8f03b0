//! Command dispatch - runs a parsed CLI invocation and returns the exit code.

use crate::cli::{Cli, Commands, NodeCommands, PairArgs, VerbArg};
use crate::errors::{exit_code_for, EXIT_SUCCESS};
use crate::output;
use anyhow::{Context, Result};
use replica_common::{
    ExecutionResult, Orchestrator, ReplicaConfig, TopologyAction, TopologyCommand, TopologyMode,
};
use tracing::debug;

/// Load config, apply CLI overrides
pub fn load_config(cli: &Cli) -> Result<ReplicaConfig> {
    let mut config = ReplicaConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = &cli.data_file {
        config.data_file = path.clone();
    }
    Ok(config)
}

pub async fn run(cli: Cli) -> Result<i32> {
    let config = load_config(&cli)?;
    debug!(
        "Registry {}, executor {}",
        config.data_file.display(),
        config.executor.script_path.display()
    );
    let orchestrator = Orchestrator::new(&config);

    match cli.command {
        Commands::Node { action } => node(&orchestrator, action).await,
        Commands::Mm {
            verb,
            pair,
            data_strategy,
        } => topology(&orchestrator, TopologyMode::MasterMaster, verb, &pair, data_strategy, None).await,
        Commands::Ms { verb, pair, master } => {
            topology(&orchestrator, TopologyMode::MasterSlave, verb, &pair, None, master).await
        }
    }
}

async fn node(orchestrator: &Orchestrator, action: NodeCommands) -> Result<i32> {
    let registry = orchestrator.registry();

    match action {
        NodeCommands::List { json } => {
            let nodes = registry.list()?;
            if json {
                println!("{}", output::nodes_json(&nodes)?);
            } else {
                print!("{}", output::nodes_table(&nodes));
            }
            Ok(EXIT_SUCCESS)
        }
        NodeCommands::Show { id, json } => {
            let node = registry.require(&id)?;
            if json {
                println!("{}", output::node_json(&node)?);
            } else {
                print!("{}", output::node_detail(&node));
            }
            Ok(EXIT_SUCCESS)
        }
        NodeCommands::Add(fields) => {
            let node = registry.add(fields.into_draft())?;
            println!("{}", node.id);
            Ok(EXIT_SUCCESS)
        }
        NodeCommands::Edit { id, fields } => {
            let existing = registry.require(&id)?;
            registry.update(existing.replaced_by(fields.into_draft())?)?;
            println!("Updated {}", id);
            Ok(EXIT_SUCCESS)
        }
        NodeCommands::Delete { id } => {
            if registry.delete(&id)? {
                println!("Deleted {}", id);
            } else {
                println!("No node {}; nothing to delete", id);
            }
            Ok(EXIT_SUCCESS)
        }
        NodeCommands::Test { id, json } => {
            let node = registry.require(&id)?;
            let result = orchestrator.test_node(&id).await?;
            report(&format!("connection test {} ({})", node.name, node.endpoint()), &result, json)
        }
    }
}

async fn topology(
    orchestrator: &Orchestrator,
    mode: TopologyMode,
    verb: VerbArg,
    pair: &PairArgs,
    data_strategy: Option<String>,
    ms_master: Option<String>,
) -> Result<i32> {
    let action = TopologyAction::new(mode, verb.into());
    let command = TopologyCommand {
        node_a_id: pair.node_a.clone(),
        node_b_id: pair.node_b.clone(),
        action,
        options: pair.options(data_strategy, ms_master),
    };

    let result = orchestrator.run(command).await?;
    let title = format!("{} {}", mode.short_name(), action.verb().as_str());
    report(&title, &result, pair.json)
}

fn report(title: &str, result: &ExecutionResult, json: bool) -> Result<i32> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", output::result_text(title, result));
    }
    Ok(exit_code_for(result.classification))
}
