use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mod-installer")]
#[command(about = "Install mod archives into a mods directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install an archive as a mod
    Install(InstallArgs),
    /// List archive extensions that can be installed
    Extensions(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Archive to install
    pub archive: PathBuf,
    /// Mod name to use instead of the one guessed from the archive
    #[arg(long)]
    pub name: Option<String>,
    /// Directory to install into, overriding the config file
    #[arg(long)]
    pub mods_dir: Option<PathBuf>,
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Settings file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
