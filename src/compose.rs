use crate::config::ComposeConfig;
use crate::error::{ProvisionError, Result};
use dialoguer::Confirm;
use log::{info, warn};
use tokio::process::Command;

/// Arguments for `docker-compose -f a.yml -f b.yml up -d`
pub fn compose_args(config: &ComposeConfig) -> Vec<String> {
    let mut args = Vec::with_capacity(config.files.len() * 2 + 2);
    for file in &config.files {
        args.push("-f".to_string());
        args.push(file.clone());
    }
    args.push("up".to_string());
    args.push("-d".to_string());
    args
}

/// Ask whether to start the containers. Defaults to yes.
pub fn confirm_start() -> bool {
    match Confirm::new()
        .with_prompt("Do you want to start Docker Compose?")
        .default(true)
        .interact()
    {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Could not read an answer from the terminal: {}", e);
            false
        }
    }
}

/// Launch the compose stack detached, capturing stderr for diagnostics
pub async fn start(config: &ComposeConfig) -> Result<()> {
    let args = compose_args(config);
    info!("running {} {}", config.program, args.join(" "));

    let output = Command::new(&config.program)
        .args(&args)
        .stdin(std::process::Stdio::null())
        .output()
        .await
        .map_err(|source| ProvisionError::ComposeLaunch {
            program: config.program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ProvisionError::ComposeExit {
            program: config.program.clone(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(())
}
