//! Command dispatch: wires CLI arguments to services

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::instrument;

use crate::application::services::projector;
use crate::application::{DeleteOutcome, MissingDeletePolicy};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{NewNode, NodeUpdate};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    // Completion needs no settings or store
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "sitetree", &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.store_dir.clone()).map_err(InfraError::from)?;
    let container = ServiceContainer::new(settings)?;

    match &cli.command {
        Some(Commands::Tree) => _tree(&container),
        Some(Commands::Show { id }) => _show(&container, id),
        Some(Commands::Breadcrumb { id, separator }) => {
            _breadcrumb(&container, id, separator.as_deref())
        }
        Some(Commands::Options) => _options(&container),
        Some(Commands::Add {
            name,
            parent,
            kind,
            order,
            url,
            unpublished,
            id,
        }) => _add(
            &container,
            NewNode {
                id: id.clone(),
                name: name.clone(),
                kind: Some((*kind).into()),
                display_order: *order,
                published: !unpublished,
                url: url.clone(),
            },
            parent.as_deref(),
        ),
        Some(Commands::Update {
            id,
            name,
            order,
            url,
            publish,
            unpublish,
        }) => {
            let update = NodeUpdate {
                name: name.clone(),
                display_order: *order,
                published: match (publish, unpublish) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                url: url.clone(),
            };
            _update(&container, id, update)
        }
        Some(Commands::Remove { id, strict }) => _remove(&container, id, *strict),
        Some(Commands::Config { command }) => _config(&container, command),
        Some(Commands::Completion { .. }) => unreachable!("handled above"),
        None => Ok(()),
    }
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer) -> CliResult<()> {
    let forest = container.tree.load().map_err(InfraError::from)?;
    if forest.is_empty() {
        output::info("(empty forest)");
        return Ok(());
    }
    for tree in projector::render_forest(&forest) {
        output::info(&tree);
    }
    output::detail(&format!(
        "{} roots, {} nodes, depth {}",
        forest.root_count(),
        forest.len(),
        forest.depth()
    ));
    Ok(())
}

#[instrument(skip(container))]
fn _show(container: &ServiceContainer, id: &str) -> CliResult<()> {
    let forest = container.tree.load().map_err(InfraError::from)?;
    let Some(node) = forest.find_node(id) else {
        return Err(CliError::Usage(format!("no node with id: {id}")));
    };

    output::header(&node.name);
    output::action("id", &node.id);
    output::action("kind", &node.kind);
    output::action("published", &node.published);
    output::action("display_order", &node.display_order);
    if let Some(url) = &node.url {
        output::action("url", url);
    }
    if let Some(parent) = forest.find_parent(id) {
        if parent.id != node.id {
            output::action("parent", &parent.id);
        }
    }
    output::action("children", &node.children.len());
    output::action(
        "path",
        &projector::breadcrumb(&forest, id, &container.settings.breadcrumb_separator),
    );
    Ok(())
}

#[instrument(skip(container))]
fn _breadcrumb(container: &ServiceContainer, id: &str, separator: Option<&str>) -> CliResult<()> {
    let forest = container.tree.load().map_err(InfraError::from)?;
    let separator = separator.unwrap_or(&container.settings.breadcrumb_separator);
    output::info(&projector::breadcrumb(&forest, id, separator));
    Ok(())
}

#[instrument(skip(container))]
fn _options(container: &ServiceContainer) -> CliResult<()> {
    let forest = container.tree.load().map_err(InfraError::from)?;
    for option in projector::select_options(&forest) {
        output::info(&format!("{}\t{}", option.id, option.indented_label()));
    }
    Ok(())
}

#[instrument(skip(container, new))]
fn _add(container: &ServiceContainer, new: NewNode, parent: Option<&str>) -> CliResult<()> {
    let node = container
        .tree
        .insert(parent, new)
        .map_err(InfraError::from)?;
    output::success(&format!("added {} ({})", node.name, node.id));
    Ok(())
}

#[instrument(skip(container, update))]
fn _update(container: &ServiceContainer, id: &str, update: NodeUpdate) -> CliResult<()> {
    if update.is_empty() {
        return Err(CliError::Usage("nothing to update".to_string()));
    }
    let node = container
        .tree
        .update(id, update)
        .map_err(InfraError::from)?;
    output::success(&format!("updated {} ({})", node.name, node.id));
    Ok(())
}

#[instrument(skip(container))]
fn _remove(container: &ServiceContainer, id: &str, strict: bool) -> CliResult<()> {
    let policy = if strict {
        MissingDeletePolicy::Error
    } else {
        container.settings.missing_delete
    };
    let outcome = container
        .tree
        .delete_with_policy(id, policy)
        .map_err(InfraError::from)?;
    match outcome {
        DeleteOutcome::RootDeleted { id, removed } => {
            output::success(&format!("removed root {id} ({removed} nodes)"));
        }
        DeleteOutcome::Detached {
            id,
            parent_id,
            removed,
        } => {
            output::success(&format!(
                "removed {id} from {parent_id} ({removed} nodes)"
            ));
        }
        DeleteOutcome::NotFound { id } => {
            output::warning(&format!("no node with id {id}, nothing removed"));
        }
    }
    Ok(())
}

fn _config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let rendered = toml::to_string_pretty(container.settings.as_ref())
                .map_err(|e| CliError::Usage(format!("cannot render config: {e}")))?;
            output::info(&rendered);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&path.display()),
                None => output::warning("no home directory, global config unavailable"),
            }
            Ok(())
        }
    }
}
