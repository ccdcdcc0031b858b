mod cli;
mod prompt;

use anyhow::{bail, Context};
use clap::Parser;
use cli::{Cli, Commands, ConfigArgs, InstallArgs};
use mod_installer_lib::services::config::{ConfigService, InstallerSettings};
use mod_installer_lib::services::installer::InstallOutcome;
use mod_installer_lib::services::metadata::initial_mod_name;
use mod_installer_lib::InstallationManager;
use prompt::TerminalDecisions;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Commands::Install(args) => run_install(args),
        Commands::Extensions(args) => {
            let mut manager = InstallationManager::new(load_settings(&args));
            manager.register_default_installers();
            for extension in manager.supported_extensions() {
                println!("{extension}");
            }
            Ok(())
        }
    }
}

fn load_settings(args: &ConfigArgs) -> InstallerSettings {
    match &args.config {
        Some(path) => ConfigService::new(path.clone()).get_settings(),
        None => InstallerSettings::default(),
    }
}

fn run_install(args: InstallArgs) -> anyhow::Result<()> {
    let mut settings = load_settings(&args.config);
    if let Some(dir) = args.mods_dir {
        settings.mods_directory = dir;
    }
    log::debug!("mods directory: {}", settings.mods_directory.display());

    let mut manager = InstallationManager::new(settings);
    manager.register_default_installers();

    let mut mod_name = initial_mod_name(args.name);

    let result = manager.install(&args.archive, &mut mod_name, &mut TerminalDecisions);
    manager.scratch_files().cleanup();
    let report = result.with_context(|| format!("installing {}", args.archive.display()))?;

    match report.outcome {
        InstallOutcome::Success => {
            println!("Installed \"{}\"", mod_name.value());
            if report.has_ini_tweaks {
                println!("The archive ships optional INI tweaks.");
            }
        }
        InstallOutcome::Canceled => println!("Installation cancelled."),
        other => bail!("installation ended with {other:?}"),
    }
    Ok(())
}
