//! Download the SPICE kernels the `spice` backend needs into `data/spice/`
//! (or the directory given as the first argument), then list what is present.

use std::path::{Path, PathBuf};

use anyhow::Result;
use orrery::ephemeris::kernels::{KERNEL_CATALOG, LOCAL_SPICE_DIR};
use orrery::ephemeris::spice::kernel_summaries;
use orrery::importer::{KernelStatus, download_kernels};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let target_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(LOCAL_SPICE_DIR));

    for status in download_kernels(KERNEL_CATALOG, &target_dir)? {
        match status {
            KernelStatus::AlreadyPresent(path) => {
                println!("[skip] already present at {}", display_path(&path))
            }
            KernelStatus::Downloaded(path) => println!("[ok] {}", display_path(&path)),
        }
    }

    match kernel_summaries(&target_dir) {
        Ok(summaries) => {
            println!("\nLocal kernel summaries:");
            for summary in summaries {
                println!(
                    "  - {:<13} [{} | {}] {}\n      └ {}",
                    summary.descriptor.filename,
                    summary.descriptor.kind.label(),
                    format_size(summary.file_size_bytes),
                    summary.descriptor.description,
                    display_path(&summary.path)
                );
            }
        }
        Err(err) => eprintln!("[warn] unable to summarize kernels: {err}"),
    }

    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
