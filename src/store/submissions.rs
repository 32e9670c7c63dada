//! Flat-file submission store
//!
//! Payloads are plain text files named `<id>.txt` under the base
//! directory; bookkeeping lives in a single `metadata.json` document that
//! is loaded lazily, cached per instance, and rewritten in full after each
//! mutation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;

use crate::error::{Error, NotFoundKind, Result};
use crate::logging::Logger;

use super::metadata::{MetadataDocument, SubmissionMeta, METADATA_FILE};

/// Retention window applied by the sweep that runs after every store.
pub const DEFAULT_RETENTION_DAYS: i64 = 28;

/// Store for named line-oriented payloads with JSON-backed metadata.
///
/// Single-writer by contract: every operation takes `&mut self` and no
/// file lock is taken on the metadata document, so concurrent processes
/// sharing a base directory race with last-writer-wins semantics.
#[derive(Debug)]
pub struct SubmissionStore {
    base_dir: PathBuf,
    /// Metadata document, loaded on first use and cached for the lifetime
    /// of this instance
    metadata: Option<MetadataDocument>,
    logger: Arc<Logger>,
}

impl SubmissionStore {
    /// Open a store rooted at `base_dir`, creating the directory and an
    /// empty metadata document if they do not exist yet.
    pub fn new(base_dir: impl Into<PathBuf>, logger: Arc<Logger>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .map_err(|e| Error::storage("create directory", &base_dir, e))?;

        let store = Self {
            base_dir,
            metadata: None,
            logger,
        };

        let metadata_path = store.metadata_path();
        if !metadata_path.exists() {
            fs::write(&metadata_path, "{}")
                .map_err(|e| Error::storage("write", &metadata_path, e))?;
        }

        Ok(store)
    }

    /// Base directory of this store.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Store `payload` under `id`, overwriting any previous submission
    /// with that id and stamping its metadata entry with the current time.
    ///
    /// Every store is followed by a cleanup sweep with the default
    /// retention window.
    pub fn store_submission(&mut self, id: &str, payload: &[String]) -> Result<()> {
        let logger = Arc::clone(&self.logger);
        let _scope = logger.enter("SubmissionStore::store_submission");
        validate_id(id)?;

        let payload_path = self.payload_path(id);
        let mut contents = String::new();
        for line in payload {
            contents.push_str(line);
            contents.push('\n');
        }
        fs::write(&payload_path, contents)
            .map_err(|e| Error::storage("write", &payload_path, e))?;

        self.metadata_mut()?
            .insert(id.to_string(), SubmissionMeta::now());
        self.save_metadata()?;

        self.cleanup_submissions(DEFAULT_RETENTION_DAYS)?;

        self.logger.info(format!(
            "Stored submission '{}' in '{}'.",
            id,
            payload_path.display()
        ));
        Ok(())
    }

    /// Load the payload and metadata entry for `id`.
    ///
    /// Fails with [`Error::NotFound`]; the kind distinguishes an id absent
    /// from the metadata document from an entry whose payload file is
    /// gone. A successful load is followed by the default cleanup sweep;
    /// the returned entry is the one read before the sweep.
    pub fn load_submission(&mut self, id: &str) -> Result<(Vec<String>, SubmissionMeta)> {
        let logger = Arc::clone(&self.logger);
        let _scope = logger.enter("SubmissionStore::load_submission");

        let entry = match self.metadata_mut()?.get(id) {
            Some(entry) => entry.clone(),
            None => {
                self.logger
                    .error(format!("No metadata entry for submission '{id}'."));
                return Err(Error::NotFound {
                    id: id.to_string(),
                    kind: NotFoundKind::MissingMetadata,
                });
            }
        };

        let payload_path = self.payload_path(id);
        let contents = match fs::read_to_string(&payload_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.logger.error(format!(
                    "Payload file '{}' missing for submission '{id}'.",
                    payload_path.display()
                ));
                return Err(Error::NotFound {
                    id: id.to_string(),
                    kind: NotFoundKind::MissingPayload,
                });
            }
            Err(e) => return Err(Error::storage("read", &payload_path, e)),
        };
        let payload = contents.lines().map(String::from).collect();

        self.logger.info(format!("Loaded submission '{id}'."));
        self.cleanup_submissions(DEFAULT_RETENTION_DAYS)?;

        Ok((payload, entry))
    }

    /// Load only the payload for `id`; same lookup and failure modes as
    /// [`SubmissionStore::load_submission`].
    pub fn load_only_payload(&mut self, id: &str) -> Result<Vec<String>> {
        let (payload, _) = self.load_submission(id)?;
        Ok(payload)
    }

    /// Delete every submission strictly older than `older_than_days` and
    /// reconcile the metadata document with the files on disk.
    ///
    /// Age is compared in whole days, so an entry exactly at the window is
    /// retained. The document is rewritten at most once, and only when the
    /// sweep changed something. Returns the number of aged-out entries.
    pub fn cleanup_submissions(&mut self, older_than_days: i64) -> Result<usize> {
        let logger = Arc::clone(&self.logger);
        let _scope = logger.enter("SubmissionStore::cleanup_submissions");
        self.logger.info(format!(
            "Cleaning up submissions older than {older_than_days} days..."
        ));

        let now = Utc::now();
        let stale: Vec<String> = self
            .metadata_mut()?
            .iter()
            .filter(|(_, entry)| (now - entry.indexed_at).num_days() > older_than_days)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &stale {
            let payload_path = self.payload_path(id);
            if payload_path.exists() {
                fs::remove_file(&payload_path)
                    .map_err(|e| Error::storage("remove", &payload_path, e))?;
                self.logger.info(format!(
                    "Deleted file '{}' for old submission '{id}'.",
                    payload_path.display()
                ));
            }
            self.metadata_mut()?.remove(id);
        }
        let removed = stale.len();

        let repaired = self.reconcile()?;

        if removed + repaired > 0 {
            self.save_metadata()?;
        }

        if removed > 0 {
            self.logger.info(format!(
                "Deleted {removed} submissions older than {older_than_days} days."
            ));
        } else {
            self.logger.info("No old submissions found to delete.");
        }

        Ok(removed)
    }

    /// Drop metadata entries whose payload file vanished and delete
    /// payload files that have no metadata entry. Returns the number of
    /// repairs made.
    fn reconcile(&mut self) -> Result<usize> {
        let mut repairs = 0;

        let ids: Vec<String> = self.metadata_mut()?.keys().cloned().collect();
        for id in ids {
            if !self.payload_path(&id).exists() {
                self.metadata_mut()?.remove(&id);
                self.logger.warning(format!(
                    "Dropped metadata for submission '{id}': payload file missing."
                ));
                repairs += 1;
            }
        }

        let entries = fs::read_dir(&self.base_dir)
            .map_err(|e| Error::storage("read directory", &self.base_dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::storage("read directory", &self.base_dir, e))?;
            let path = entry.path();
            let id = match path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(".txt"))
            {
                Some(id) => id.to_string(),
                None => continue,
            };
            if !self.metadata_mut()?.contains_key(&id) {
                fs::remove_file(&path).map_err(|e| Error::storage("remove", &path, e))?;
                self.logger
                    .warning(format!("Deleted orphaned payload file '{}'.", path.display()));
                repairs += 1;
            }
        }

        Ok(repairs)
    }

    fn payload_path(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{id}.txt"))
    }

    fn metadata_path(&self) -> PathBuf {
        self.base_dir.join(METADATA_FILE)
    }

    /// Lazily load the metadata document, caching it on this instance.
    ///
    /// A missing file is an empty document. An unreadable document is
    /// quarantined to a `.backup` file and treated as empty.
    fn metadata_mut(&mut self) -> Result<&mut MetadataDocument> {
        if self.metadata.is_none() {
            let document = self.read_metadata_from_disk()?;
            self.metadata = Some(document);
        }
        Ok(self.metadata.get_or_insert_with(MetadataDocument::new))
    }

    fn read_metadata_from_disk(&self) -> Result<MetadataDocument> {
        let path = self.metadata_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(MetadataDocument::new()),
            Err(e) => return Err(Error::storage("read", &path, e)),
        };

        if contents.trim().is_empty() {
            return Ok(MetadataDocument::new());
        }

        match serde_json::from_str(&contents) {
            Ok(document) => Ok(document),
            Err(e) => {
                self.logger.warning(format!(
                    "Cannot parse '{}', starting with empty metadata. Error: {e}",
                    path.display()
                ));
                backup_corrupted_file(&path, &self.logger);
                Ok(MetadataDocument::new())
            }
        }
    }

    /// Rewrite the whole metadata document.
    fn save_metadata(&mut self) -> Result<()> {
        let path = self.metadata_path();
        let document = self.metadata.get_or_insert_with(MetadataDocument::new);
        let contents = serde_json::to_string_pretty(document).map_err(|e| Error::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, contents).map_err(|e| Error::storage("write", &path, e))
    }
}

/// The id names a payload file directly under the base directory, so
/// anything that could leave that directory is rejected up front.
fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidId {
            id: id.to_string(),
            reason: "id must not be empty",
        });
    }
    if id.contains(['/', '\\']) || id == "." || id == ".." {
        return Err(Error::InvalidId {
            id: id.to_string(),
            reason: "id must not contain path components",
        });
    }
    Ok(())
}

/// Quarantine an unreadable metadata document by renaming it.
fn backup_corrupted_file(path: &Path, logger: &Logger) {
    let backup_path = path.with_extension("json.backup");
    if let Err(e) = fs::rename(path, &backup_path) {
        logger.warning(format!(
            "Failed to back up corrupted metadata file '{}': {e}",
            path.display()
        ));
    } else {
        logger.warning(format!(
            "Corrupted metadata file backed up to '{}'.",
            backup_path.display()
        ));
    }
}
