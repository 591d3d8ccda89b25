use clap::{Parser, Subcommand};
use std::path::PathBuf;
mod archive;
mod compose;
mod config;
mod error;
mod provision;
mod utils;

use config::{ConfigOverrides, ProvisionConfig};
use provision::ComposeChoice;

/// Fetch a WordPress release and lay out the admin directory for local development
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download, unpack and relocate the release, then optionally start docker-compose
    Install {
        /// JSON file with the install configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// URL of the gzip-compressed tarball
        #[arg(long)]
        url: Option<String>,

        /// Scratch directory for the download and extracted tree
        #[arg(long)]
        scratch_dir: Option<PathBuf>,

        /// File name of the downloaded archive
        #[arg(long)]
        archive_name: Option<String>,

        /// Subdirectory to keep, relative to the scratch directory
        #[arg(long)]
        relocate_from: Option<PathBuf>,

        /// Where the kept subdirectory ends up
        #[arg(long)]
        relocate_to: Option<PathBuf>,

        /// Start docker-compose without asking
        #[arg(short, long, default_value_t = false, conflicts_with = "no_compose")]
        yes: bool,

        /// Never start docker-compose
        #[arg(long, default_value_t = false)]
        no_compose: bool,
    },
    /// Unpack a local .tar.gz archive
    Unpack {
        /// Path to the archive
        #[arg(value_name = "ARCHIVE")]
        archive_path: PathBuf,

        /// Directory to unpack into
        destination: PathBuf,
    },
    /// Recursively delete a directory
    Clean {
        /// Path to remove
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .format_module_path(false)
        .parse_env("WP_SETUP_LOG")
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.command).await {
        log::debug!("{:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> error::Result<()> {
    match command {
        Commands::Install {
            config,
            url,
            scratch_dir,
            archive_name,
            relocate_from,
            relocate_to,
            yes,
            no_compose,
        } => {
            let config = ProvisionConfig::load(config.as_deref())?.apply(ConfigOverrides {
                source_url: url,
                scratch_dir,
                archive_name,
                relocate_from,
                relocate_to,
            });

            let choice = if no_compose {
                ComposeChoice::Never
            } else if yes {
                ComposeChoice::Always
            } else {
                ComposeChoice::Ask
            };

            println!("Source: {}", config.source_url);
            println!("Scratch directory: {}", config.scratch_dir.display());

            let report = provision::install(&config, choice).await?;
            println!(
                "Installed {} from {} bytes ({} files, {} directories)",
                config.relocate_to.display(),
                report.downloaded_bytes,
                report.unpacked.files,
                report.unpacked.directories
            );
            if report.compose == provision::ComposeOutcome::Failed {
                println!("docker-compose did not start; run it by hand once the error above is fixed");
            }
        }
        Commands::Unpack {
            archive_path,
            destination,
        } => {
            utils::files::ensure_directory(&destination)?;
            let summary = tokio::task::spawn_blocking(move || {
                archive::unpack_file(&destination, &archive_path)
            })
            .await??;
            println!(
                "Unpacked {} files and {} directories",
                summary.files, summary.directories
            );
        }
        Commands::Clean { path } => {
            utils::files::clean_up(&path)?;
            println!("Removed {}", path.display());
        }
    }

    Ok(())
}
