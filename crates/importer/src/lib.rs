//! SPICE kernel import utilities.

use orrery_ephem::kernels::KernelDescriptor;
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::copy;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of attempting to download a kernel.
#[derive(Debug, PartialEq, Eq)]
pub enum KernelStatus {
    Downloaded(PathBuf),
    AlreadyPresent(PathBuf),
}

/// Download every kernel in `descriptors` that is not already present in `dir`.
pub fn download_kernels(
    descriptors: &[KernelDescriptor],
    dir: &Path,
) -> Result<Vec<KernelStatus>, ImportError> {
    fs::create_dir_all(dir)?;
    let client = Client::builder().build()?;
    let mut statuses = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let dest = descriptor.path_in(dir);
        if dest.exists() {
            statuses.push(KernelStatus::AlreadyPresent(dest));
            continue;
        }
        info!(url = descriptor.url, dest = %dest.display(), "downloading kernel");
        download_kernel(&client, descriptor, &dest)?;
        statuses.push(KernelStatus::Downloaded(dest));
    }

    Ok(statuses)
}

fn download_kernel(
    client: &Client,
    descriptor: &KernelDescriptor,
    dest: &Path,
) -> Result<(), ImportError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    // Renamed into place only after the body is fully written.
    let partial = dest.with_extension("part");
    let mut response = client.get(descriptor.url).send()?.error_for_status()?;
    let mut file = File::create(&partial)?;
    copy(&mut response, &mut file)?;
    fs::rename(&partial, dest)?;
    Ok(())
}
