//! Command dispatch: maps subcommands to rollout service calls

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings, LOCAL_CONFIG_FILE};
use crate::domain::{parse_flag, ReportKind, SiteUpdate};
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| io_err("print help", e))?;
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => cmd_completion(*shell),
        Commands::Config { command } => cmd_config(cli, command),
        Commands::Tree { design } => cmd_tree(&create_container(cli)?, *design),
        Commands::Stats => cmd_stats(&create_container(cli)?),
        Commands::Deps => cmd_deps(&create_container(cli)?),
        Commands::Report { kind, output } => {
            cmd_report(&create_container(cli)?, kind, output.as_deref())
        }
        Commands::Update {
            site,
            transmission_in_sync,
            ip_transport_in_sync,
            site_doable,
        } => {
            let update = SiteUpdate {
                site_id: site.clone(),
                transmission_in_sync: parse_flag("transmission_in_sync", transmission_in_sync)?,
                ip_transport_in_sync: parse_flag("ip_transport_in_sync", ip_transport_in_sync)?,
                site_doable: parse_flag("site_doable", site_doable)?,
            };
            cmd_update(&create_container(cli)?, &update)
        }
        Commands::Orphans => cmd_orphans(&create_container(cli)?),
    }
}

fn io_err(context: &str, source: io::Error) -> CliError {
    CliError::Io {
        context: context.to_string(),
        source,
    }
}

/// Settings from all layers, with `--data-file` on top.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(data_file) = &cli.data_file {
        settings = settings.with_data_file(data_file);
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn create_container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(load_settings(cli)?)?)
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(no config directory)".to_string());
            let local = cli
                .config
                .as_deref()
                .unwrap_or(Path::new(LOCAL_CONFIG_FILE));
            output::field("global", 6, &global);
            output::field("local", 6, &local.display());
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(container: &ServiceContainer, design: bool) -> CliResult<()> {
    let tree = container.rollout.classified_tree();
    let policy = tree.policy().clone();
    let rendered = tree.to_tree_with(|node| {
        if !node.is_site() {
            return node.site_id().bold().to_string();
        }
        let colors = node.colors();
        let color = if design { colors.design } else { colors.implementation };
        if policy.is_tracked(&node.record.domain) {
            format!(
                "{} {}",
                output::paint(node.site_id(), color),
                format!("[{}]", node.status).dimmed()
            )
        } else {
            format!("{} ({})", node.site_id(), node.record.domain)
        }
    });
    output::info(&rendered);
    Ok(())
}

fn cmd_stats(container: &ServiceContainer) -> CliResult<()> {
    let stats = container.rollout.statistics();
    const W: usize = 26;

    output::header("Rollout");
    output::field("tracked sites", W, &stats.total_tracked_sites);
    output::field("in sync", W, &stats.in_sync_sites_count);
    output::field("blocked locally", W, &stats.total_blocked_locally);
    output::field("blocked by parents design", W, &stats.blocked_by_parents_design);
    output::field("pending parents sync", W, &stats.pending_parents_sync);
    output::field("pending transmission", W, &stats.pending_transmission);
    output::field("ready by design", W, &stats.ready_by_design);

    output::header("Ready by design");
    output::field("SOW and tech data", W, &stats.total_sow_and_tech_data);
    output::field("SOW, no tech data", W, &stats.total_sow_no_tech_data);
    output::field("doable, no SOW", W, &stats.total_doable_no_sow);

    output::header("Blocked");
    output::field("total blocked", W, &stats.total_blocked_sites);
    output::field("affected by parent", W, &stats.total_affected_by_parent);
    output::field("blocked with SOW issued", W, &stats.blocked_issued_sow);
    Ok(())
}

fn cmd_deps(container: &ServiceContainer) -> CliResult<()> {
    for edge in container.rollout.dependencies() {
        output::info(&format!(
            "{} <- transport: {}, access: {}",
            edge.site_id,
            edge.transport_dependency.as_deref().unwrap_or("-"),
            edge.access_dependency.as_deref().unwrap_or("-"),
        ));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_report(container: &ServiceContainer, kind: &str, out: Option<&Path>) -> CliResult<()> {
    let kind: ReportKind = kind.parse()?;
    let report = container.rollout.report(kind);

    match out {
        Some(path) => {
            let context = format!("write {}", path.display());
            let file = File::create(path).map_err(|e| io_err(&context, e))?;
            output::write_csv(&mut BufWriter::new(file), &report)
                .map_err(|e| io_err(&context, e))?;
            output::success(&format!(
                "{}: {} rows written to {}",
                kind,
                report.rows.len(),
                path.display()
            ));
        }
        None => {
            output::write_csv(&mut io::stdout().lock(), &report)
                .map_err(|e| io_err("write stdout", e))?;
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_update(container: &ServiceContainer, update: &SiteUpdate) -> CliResult<()> {
    container.rollout.apply_update(update)?;

    let tree = container.rollout.classified_tree();
    match tree.find(&update.site_id).and_then(|idx| tree.get_node(idx)) {
        Some(node) => output::success(&format!(
            "{} updated, now {}",
            update.site_id,
            output::paint(node.status.label(), node.colors().implementation)
        )),
        None => output::warning(&format!(
            "{} updated but not attached to the hierarchy",
            update.site_id
        )),
    }
    Ok(())
}

fn cmd_orphans(container: &ServiceContainer) -> CliResult<()> {
    let orphans = container.rollout.orphans();
    if orphans.is_empty() {
        output::success("all records attached");
        return Ok(());
    }
    output::header(&format!("{} unattached records", orphans.len()));
    for orphan in &orphans {
        output::detail(orphan);
    }
    Ok(())
}
