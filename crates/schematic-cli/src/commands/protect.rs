// crates/schematic-cli/src/commands/protect.rs
//
// `schematic {protect, protect-all, update-all, regenerate}`.
//
// Batch commands fan out one blocking task per file; each task loads,
// updates, and saves its own asset.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::task::{spawn_blocking, JoinHandle};

use schematic_core::{protect, protect_all, update_all as core_update_all, ProtectOutcome};
use schematic_export::ExportError;

use super::Context;
use crate::files::{load_asset, save_asset};
use crate::output::{format_json, OutputFormat};

#[derive(Debug, Serialize)]
struct FileOutcome {
    file: PathBuf,
    #[serde(flatten)]
    outcome: ProtectOutcome,
}

/// Run protect (or regenerate, with `force`) on one file.
pub async fn run(ctx: &Context, file: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut asset = load_asset(file)?;
    let outcome = protect(&mut asset, force)?;
    save_asset(file, &asset)?;

    match ctx.format {
        OutputFormat::Json => println!(
            "{}",
            format_json(&FileOutcome {
                file: file.to_path_buf(),
                outcome
            })
        ),
        OutputFormat::Text => {
            if outcome.watermarked {
                println!("Watermark applied to {}", asset.metadata.title);
            } else {
                println!("Existing watermark kept for {}", asset.metadata.title);
            }
            println!("  Fingerprint: {}", outcome.fingerprint);
        }
    }
    Ok(())
}

/// Spawn `job` for every distinct file and wait for all of them, in input
/// order. Repeated paths are dropped so no file has two tasks writing it.
async fn fan_out<T, F>(files: Vec<PathBuf>, job: F) -> Vec<(PathBuf, Result<T, String>)>
where
    T: Send + 'static,
    F: Fn(&Path) -> Result<T, ExportError> + Send + Sync + Copy + 'static,
{
    let mut seen = HashSet::new();
    let handles: Vec<(PathBuf, JoinHandle<Result<T, ExportError>>)> = files
        .into_iter()
        .filter(|file| seen.insert(file.clone()))
        .map(|file| {
            let path = file.clone();
            (file, spawn_blocking(move || job(&path)))
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (file, handle) in handles {
        let result = match handle.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(format!("task failed: {}", e)),
        };
        results.push((file, result));
    }
    results
}

fn protect_file(path: &Path) -> Result<bool, ExportError> {
    let mut asset = load_asset(path)?;
    let protected = protect_all(std::slice::from_mut(&mut asset))? > 0;
    if protected {
        save_asset(path, &asset)?;
    }
    Ok(protected)
}

fn update_file(path: &Path) -> Result<String, ExportError> {
    let mut asset = load_asset(path)?;
    core_update_all(std::slice::from_mut(&mut asset))?;
    save_asset(path, &asset)?;
    Ok(asset.geometric_hash().to_string())
}

#[derive(Debug, Serialize)]
struct BatchEntry<T> {
    file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn report<T: Serialize>(
    ctx: &Context,
    results: Vec<(PathBuf, Result<T, String>)>,
    describe: impl Fn(&T) -> String,
) -> Result<(), Box<dyn std::error::Error>> {
    let failures = results.iter().filter(|(_, r)| r.is_err()).count();

    match ctx.format {
        OutputFormat::Json => {
            let entries: Vec<BatchEntry<&T>> = results
                .iter()
                .map(|(file, r)| BatchEntry {
                    file: file.clone(),
                    result: r.as_ref().ok(),
                    error: r.as_ref().err().cloned(),
                })
                .collect();
            println!("{}", format_json(&entries));
        }
        OutputFormat::Text => {
            for (file, result) in &results {
                match result {
                    Ok(value) => println!("  {}: {}", file.display(), describe(value)),
                    Err(e) => println!("  {}: ERROR {}", file.display(), e),
                }
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} files failed", failures, results.len()).into());
    }
    Ok(())
}

/// Protect every file that lacks a fingerprint or a watermark.
pub async fn run_all(ctx: &Context, files: Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let results = fan_out(files, protect_file).await;
    let protected = results.iter().filter(|(_, r)| matches!(r, Ok(true))).count();
    if ctx.format == OutputFormat::Text {
        println!("Protected {} of {} schematics.", protected, results.len());
    }
    report(ctx, results, |&done| {
        if done {
            "protected".to_string()
        } else {
            "already protected".to_string()
        }
    })
}

/// Recompute the fingerprint of every file.
pub async fn update_all(ctx: &Context, files: Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let results = fan_out(files, update_file).await;
    if ctx.format == OutputFormat::Text {
        println!("Updated fingerprints of {} schematics.", results.len());
    }
    report(ctx, results, |hash| hash.clone())
}
