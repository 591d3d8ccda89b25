use crate::archive::{self, UnpackSummary};
use crate::compose;
use crate::config::ProvisionConfig;
use crate::error::{ProvisionError, Result};
use crate::utils::{files, http};
use log::{debug, info};

/// Whether to launch the compose stack once files are in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeChoice {
    Ask,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeOutcome {
    Skipped,
    Started,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallReport {
    pub downloaded_bytes: u64,
    pub unpacked: UnpackSummary,
    pub compose: ComposeOutcome,
}

/// Download, unpack, relocate and clean up, then optionally start compose.
///
/// The first failing step ends the run. Nothing already done is rolled back.
/// A compose failure is reported but does not fail the install.
pub async fn install(config: &ProvisionConfig, choice: ComposeChoice) -> Result<InstallReport> {
    let scratch = config.scratch_dir.clone();
    let archive_path = config.archive_path();

    info!("fetching {}", config.source_url);
    let downloaded_bytes = http::download_file(&scratch, &archive_path, &config.source_url).await?;

    println!("Unpacking into {} ...", scratch.display());
    let unpacked = {
        let scratch = scratch.clone();
        tokio::task::spawn_blocking(move || archive::unpack_file(&scratch, &archive_path)).await??
    };
    info!(
        "unpacked {} directories and {} files ({} skipped)",
        unpacked.directories, unpacked.files, unpacked.skipped
    );

    let source = config.relocate_source();
    files::relocate(&source, &config.relocate_to)?;
    println!(
        "Moved {} to {}",
        source.display(),
        config.relocate_to.display()
    );

    println!("Deleting {} and all its children ...", scratch.display());
    files::clean_up(&scratch)?;

    let compose = launch_compose(config, choice).await?;

    Ok(InstallReport {
        downloaded_bytes,
        unpacked,
        compose,
    })
}

async fn launch_compose(config: &ProvisionConfig, choice: ComposeChoice) -> Result<ComposeOutcome> {
    let wanted = match choice {
        ComposeChoice::Never => false,
        ComposeChoice::Always => true,
        ComposeChoice::Ask => tokio::task::spawn_blocking(compose::confirm_start).await?,
    };
    if !wanted {
        return Ok(ComposeOutcome::Skipped);
    }

    println!("Starting docker-compose in dev mode!");
    match compose::start(&config.compose).await {
        Ok(()) => {
            println!("Docker started!");
            Ok(ComposeOutcome::Started)
        }
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("Error starting docker-compose: {}", e);
            if let ProvisionError::ComposeExit { stderr, .. } = &e {
                eprintln!("{}", stderr);
            }
            Ok(ComposeOutcome::Failed)
        }
    }
}
