use crate::error::{Error, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

const PROGRESS_STEP: u64 = 1024 * 1024;

// Reader that logs progress and stops early once `cancel` is set
struct ProgressReader<'c, R: Read> {
    inner: R,
    read_bytes: u64,
    total_bytes: u64,
    last_report: u64,
    cancel: &'c AtomicBool,
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.cancel.load(Ordering::SeqCst) {
            return Ok(0);
        }
        let n = self.inner.read(buf)?;
        self.read_bytes += n as u64;
        if self.read_bytes - self.last_report >= PROGRESS_STEP || n == 0 {
            let percent = if self.total_bytes > 0 {
                self.read_bytes as f64 / self.total_bytes as f64 * 100.0
            } else {
                0.0
            };
            debug!(
                read_bytes = self.read_bytes,
                total_bytes = self.total_bytes,
                percent,
                done = n == 0,
                "parse progress"
            );
            self.last_report = self.read_bytes;
        }
        Ok(n)
    }
}

pub fn parse_document(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

pub fn read_document<R: Read>(reader: R) -> Result<Value> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

pub fn load_document(path: impl AsRef<Path>) -> Result<Value> {
    let never = AtomicBool::new(false);
    load_document_with_cancel(path, &never)
}

/// Load a JSON document from disk. Setting `cancel` from another thread
/// stops reading and yields [`Error::Canceled`].
pub fn load_document_with_cancel(path: impl AsRef<Path>, cancel: &AtomicBool) -> Result<Value> {
    let path = path.as_ref();
    let f = File::open(path)?;
    let total_bytes = f.metadata().map(|m| m.len()).unwrap_or(0);

    let progress_reader = ProgressReader {
        inner: f,
        read_bytes: 0,
        total_bytes,
        last_report: 0,
        cancel,
    };
    let parsed = serde_json::from_reader(BufReader::new(progress_reader));

    if cancel.load(Ordering::SeqCst) {
        warn!(path = %path.display(), "document load canceled");
        return Err(Error::Canceled);
    }
    let root: Value = parsed?;
    info!(path = %path.display(), bytes = total_bytes, "document loaded from file");
    Ok(root)
}
