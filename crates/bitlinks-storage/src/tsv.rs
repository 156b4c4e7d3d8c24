use async_trait::async_trait;
use bitlinks_core::cache::Result;
use bitlinks_core::{CacheError, CacheRecord, LinkCache, OriginalUrl, PerChannel, ShortLink};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

const FIELD_SEPARATOR: char = '\t';

/// Append-only, line-oriented file store.
///
/// Each record is one line of four tab-separated fields:
/// `original_url`, then the telegram, vk and instagram short links.
/// Lookups scan the file from the top and return the first line whose key
/// matches exactly, surrounding whitespace included. The oldest record for a
/// key is therefore authoritative even if the file contains duplicates
/// written by other processes.
///
/// Appends from this process are serialized and re-check the file before
/// writing, so a single process never appends a duplicate key.
#[derive(Debug)]
pub struct TsvLinkStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl TsvLinkStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file does not need to exist yet; it is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn scan(&self, url: &OriginalUrl) -> Result<Option<CacheRecord>> {
        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(path = %self.path.display(), "cache file does not exist yet");
                return Ok(None);
            }
            Err(e) => return Err(map_io_error("failed to open cache file", e)),
        };

        let mut lines = BufReader::new(file).lines();
        let mut line_no = 0usize;
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| map_io_error("failed to read cache file", e))?
        {
            line_no += 1;
            // The key is compared byte for byte; only the line ending is stripped.
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split(FIELD_SEPARATOR);
            if fields.next() != Some(url.as_str()) {
                continue;
            }

            match decode_links(fields) {
                Some(links) => return Ok(Some(CacheRecord::new(url.clone(), links))),
                None => {
                    warn!(
                        path = %self.path.display(),
                        line = line_no,
                        "skipping malformed cache line"
                    );
                }
            }
        }

        Ok(None)
    }

    async fn append(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| map_io_error("failed to open cache file for append", e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| map_io_error("failed to append to cache file", e))?;
        file.flush()
            .await
            .map_err(|e| map_io_error("failed to flush cache file", e))
    }
}

fn decode_links<'a>(mut fields: impl Iterator<Item = &'a str>) -> Option<PerChannel<ShortLink>> {
    let telegram = fields.next()?;
    let vk = fields.next()?;
    let instagram = fields.next()?;
    Some(PerChannel {
        telegram: ShortLink::new(telegram.trim()),
        vk: ShortLink::new(vk.trim()),
        instagram: ShortLink::new(instagram.trim()),
    })
}

/// Encodes a record as one appendable line.
///
/// The line starts with the newline, which is how records have always been
/// appended; existing files end without a trailing newline.
fn encode_line(record: &CacheRecord) -> Result<String> {
    let mut fields = vec![record.original_url.as_str()];
    fields.extend(record.links.iter().map(|(_, link)| link.as_str()));

    if let Some(field) = fields
        .iter()
        .find(|field| field.contains(['\t', '\n', '\r']))
    {
        return Err(CacheError::Serialization(format!(
            "field contains a tab or line break: {field:?}"
        )));
    }

    Ok(format!("\n{}", fields.join("\t")))
}

fn map_io_error(operation: &str, err: std::io::Error) -> CacheError {
    let message = format!("{operation}: {err}");

    match err.kind() {
        ErrorKind::TimedOut => CacheError::Timeout(message),
        ErrorKind::NotFound | ErrorKind::PermissionDenied => CacheError::Unavailable(message),
        ErrorKind::InvalidData | ErrorKind::UnexpectedEof => CacheError::InvalidData(message),
        _ => CacheError::Operation(message),
    }
}

#[async_trait]
impl LinkCache for TsvLinkStore {
    async fn lookup(&self, url: &OriginalUrl) -> Result<Option<CacheRecord>> {
        trace!(url = %url, "scanning cache file");
        let found = self.scan(url).await?;
        if found.is_some() {
            debug!(url = %url, "cache file hit");
        }
        Ok(found)
    }

    async fn store(&self, record: CacheRecord) -> Result<CacheRecord> {
        let line = encode_line(&record)?;

        let _guard = self.write_lock.lock().await;
        if let Some(existing) = self.scan(&record.original_url).await? {
            debug!(url = %record.original_url, "record already present, keeping first write");
            return Ok(existing);
        }

        self.append(&line).await?;
        debug!(url = %record.original_url, path = %self.path.display(), "appended record");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str) -> CacheRecord {
        CacheRecord::new(
            OriginalUrl::new(url),
            PerChannel {
                telegram: ShortLink::new("http://bit.ly/a"),
                vk: ShortLink::new("http://bit.ly/b"),
                instagram: ShortLink::new("http://bit.ly/c"),
            },
        )
    }

    #[test]
    fn encodes_four_tab_separated_fields() {
        let line = encode_line(&record("https://example.com/p?id=1")).unwrap();
        assert_eq!(
            line,
            "\nhttps://example.com/p?id=1\thttp://bit.ly/a\thttp://bit.ly/b\thttp://bit.ly/c"
        );
    }

    #[test]
    fn rejects_fields_with_separators() {
        let err = encode_line(&record("https://example.com/\tx")).unwrap_err();
        assert!(matches!(err, CacheError::Serialization(_)));

        let err = encode_line(&record("https://example.com/\nx")).unwrap_err();
        assert!(matches!(err, CacheError::Serialization(_)));
    }

    #[test]
    fn decodes_first_three_links_only() {
        let links = decode_links(["a", "b", "c", "extra"].into_iter()).unwrap();
        assert_eq!(links.instagram.as_str(), "c");
        assert!(decode_links(["a", "b"].into_iter()).is_none());
    }

    #[test]
    fn io_errors_are_classified() {
        let timeout = std::io::Error::new(ErrorKind::TimedOut, "slow disk");
        assert!(matches!(
            map_io_error("read", timeout),
            CacheError::Timeout(_)
        ));

        let denied = std::io::Error::new(ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            map_io_error("read", denied),
            CacheError::Unavailable(_)
        ));
    }
}
