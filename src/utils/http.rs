use crate::error::{ProvisionError, Result};
use crate::utils::files::ensure_directory;
use futures::stream::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Download `url` into `file_path`, making sure `directory` exists first.
///
/// An existing file at `file_path` is overwritten. The body is streamed to
/// disk as it arrives, so a failed transfer can leave a truncated file behind.
pub async fn download_file(directory: &Path, file_path: &Path, url: &str) -> Result<u64> {
    ensure_directory(directory)?;

    let client = reqwest::Client::new();
    info!("GET {}", url);

    let response = client
        .get(url)
        .header("User-Agent", get_user_agent())
        .send()
        .await
        .map_err(|source| ProvisionError::Network {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProvisionError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let pb = download_progress(response.content_length());

    let mut out = tokio::fs::File::create(file_path)
        .await
        .map_err(|e| ProvisionError::io(file_path, e))?;

    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| ProvisionError::Network {
            url: url.to_string(),
            source,
        })?;
        out.write_all(&chunk)
            .await
            .map_err(|e| ProvisionError::io(file_path, e))?;
        written += chunk.len() as u64;
        pb.set_position(written);
    }

    out.flush()
        .await
        .map_err(|e| ProvisionError::io(file_path, e))?;
    pb.finish_and_clear();

    debug!("wrote {} bytes to {}", written, file_path.display());
    println!("File downloaded: {}", file_path.display());
    Ok(written)
}

fn download_progress(length: Option<u64>) -> ProgressBar {
    match length {
        Some(len) => {
            let pb = ProgressBar::new(len);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
            ) {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {bytes} downloaded")
            {
                pb.set_style(style);
            }
            pb
        }
    }
}

/// Get standard user agent string
pub fn get_user_agent() -> &'static str {
    concat!("wp-setup/", env!("CARGO_PKG_VERSION"))
}
