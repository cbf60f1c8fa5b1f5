//! Durable output of a packaged run.
//!
//! Order on disk: stale manifest and shards for the cutoff removed, shards,
//! contamination audit, then the manifest. Each file goes through `<name>.tmp` and a rename, so a reader
//! never sees a partial file, and a manifest only exists for a complete run.

use crate::packager::{Packaged, Shard};
use crate::retry::{RetryFailure, RetryPolicy};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tempus_core::{Error, Result, audit_file_name, manifest_file_name};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

#[derive(Serialize)]
struct ShardLine<'a> {
  text: &'a str,
}

/// Files produced by a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenRun {
  pub shards: Vec<PathBuf>,
  pub audit: PathBuf,
  pub manifest: PathBuf,
}

fn tmp_path(path: &Path) -> PathBuf {
  let mut name = path.as_os_str().to_owned();
  name.push(".tmp");
  PathBuf::from(name)
}

/// `shard_NNNNN_<cutoff>.jsonl`, or its temp file
fn is_run_shard(name: &str, cutoff_year: i32) -> bool {
  let suffix = format!("_{}.jsonl", cutoff_year);
  let name = name.strip_suffix(".tmp").unwrap_or(name);
  name
    .strip_prefix("shard_")
    .and_then(|rest| rest.strip_suffix(suffix.as_str()))
    .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

fn write_failure(path: &Path, failure: RetryFailure) -> Error {
  Error::Write {
    path: path.to_path_buf(),
    attempts: failure.attempts,
    source: failure.error,
  }
}

/// One JSON object per line, `{"text": ...}`
pub fn encode_shard(shard: &Shard) -> Result<Vec<u8>> {
  let mut buf = Vec::with_capacity(shard.char_count + shard.documents.len() * 12);
  for document in &shard.documents {
    serde_json::to_writer(&mut buf, &ShardLine { text: &document.text })?;
    buf.push(b'\n');
  }
  Ok(buf)
}

pub struct ShardWriter {
  output_dir: PathBuf,
  retry: RetryPolicy,
}

impl ShardWriter {
  pub fn new(output_dir: impl Into<PathBuf>, retry: RetryPolicy) -> Self {
    Self {
      output_dir: output_dir.into(),
      retry,
    }
  }

  pub fn output_dir(&self) -> &Path {
    &self.output_dir
  }

  pub async fn write(&self, packaged: &Packaged) -> Result<WrittenRun> {
    let cutoff_year = packaged.manifest.cutoff_year;

    let dir = self.output_dir.as_path();
    self
      .retry
      .run("create output directory", || fs::create_dir_all(dir))
      .await
      .map_err(|f| write_failure(dir, f))?;

    let manifest_path = self.output_dir.join(manifest_file_name(cutoff_year));
    self.remove_stale(&manifest_path).await?;
    self.remove_stale_shards(cutoff_year).await?;

    let mut written = Vec::with_capacity(packaged.shards.len());
    for (shard, summary) in packaged.shards.iter().zip(&packaged.manifest.shards) {
      let path = self.output_dir.join(&summary.file);
      let bytes = encode_shard(shard)?;
      if let Err(e) = self.write_atomic(&path, &bytes).await {
        self.cleanup(&written, &path).await;
        return Err(e);
      }
      debug!(path = %path.display(), documents = shard.documents.len(), "Wrote shard");
      written.push(path);
    }

    let audit_path = self.output_dir.join(audit_file_name(cutoff_year));
    let mut audit = Vec::new();
    for dropped in &packaged.audit.dropped {
      serde_json::to_writer(&mut audit, dropped)?;
      audit.push(b'\n');
    }
    if let Err(e) = self.write_atomic(&audit_path, &audit).await {
      self.cleanup(&written, &audit_path).await;
      return Err(e);
    }

    let manifest = serde_json::to_vec_pretty(&packaged.manifest)?;
    if let Err(e) = self.write_atomic(&manifest_path, &manifest).await {
      written.push(audit_path);
      self.cleanup(&written, &manifest_path).await;
      return Err(e);
    }

    info!(
      dir = %self.output_dir.display(),
      shards = written.len(),
      manifest = %manifest_path.display(),
      "Wrote packaged run"
    );

    Ok(WrittenRun {
      shards: written,
      audit: audit_path,
      manifest: manifest_path,
    })
  }

  async fn remove_stale(&self, path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
      Ok(()) => {
        debug!(path = %path.display(), "Removed stale file");
        Ok(())
      }
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(Error::Write {
        path: path.to_path_buf(),
        attempts: 1,
        source: e,
      }),
    }
  }

  /// Shards left by an earlier run for the same cutoff would otherwise sit
  /// next to the new manifest
  async fn remove_stale_shards(&self, cutoff_year: i32) -> Result<()> {
    let io_error = |source: std::io::Error| Error::Write {
      path: self.output_dir.clone(),
      attempts: 1,
      source,
    };

    let mut entries = fs::read_dir(&self.output_dir).await.map_err(io_error)?;
    let mut removed = 0usize;
    while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
      let name = entry.file_name();
      let Some(name) = name.to_str() else { continue };
      if !is_run_shard(name, cutoff_year) || !entry.file_type().await.map_err(io_error)?.is_file() {
        continue;
      }
      self.remove_stale(&entry.path()).await?;
      removed += 1;
    }

    if removed > 0 {
      info!(cutoff_year, removed, "Removed stale shards");
    }
    Ok(())
  }

  async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);
    let tmp = tmp.as_path();
    self
      .retry
      .run(&path.display().to_string(), || async move {
        let mut file = fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(tmp, path).await
      })
      .await
      .map_err(|f| write_failure(path, f))
  }

  /// Best effort: a failed run leaves neither shards nor temp files behind
  async fn cleanup(&self, written: &[PathBuf], failed: &Path) {
    warn!(count = written.len(), "Removing files from failed run");
    for path in written.iter().map(PathBuf::as_path).chain([failed]) {
      for candidate in [path.to_path_buf(), tmp_path(path)] {
        if let Err(e) = fs::remove_file(&candidate).await
          && e.kind() != std::io::ErrorKind::NotFound
        {
          debug!(path = %candidate.display(), "Cleanup failed: {}", e);
        }
      }
    }
  }
}
