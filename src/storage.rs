//! JSON Lines persistence for documents.
//!
//! One JSON object per line:
//! `{"embedding": [<float>, ...], "metadata": {<key>: <value>, ...}}`.
//! Blank lines are skipped on read, unknown top-level keys are ignored, and
//! a line that fails to parse is logged and skipped so one bad record
//! cannot poison a load. Single-document saves append; bulk saves rewrite
//! the file atomically (temp file + rename).

use crate::document::Document;
use crate::store::DocumentStore;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// File-backed document storage in JSON Lines format.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Creates a storage handle for `path`. The file is not touched until
    /// the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a single document as one JSON line.
    pub fn append_document(&self, document: &Document) -> io::Result<()> {
        let line = serde_json::to_string(document).map_err(io::Error::other)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    /// Rewrites the file with the full document set.
    ///
    /// Writes to a temp file and renames it into place so a crash mid-save
    /// never leaves a half-written file behind.
    pub fn save_documents(&self, documents: &[Document]) -> io::Result<()> {
        let mut buffer = String::new();
        for document in documents {
            let line = serde_json::to_string(document).map_err(io::Error::other)?;
            buffer.push_str(&line);
            buffer.push('\n');
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        fs::write(&tmp_path, buffer)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::info!("saved {} documents to {:?}", documents.len(), self.path);
        Ok(())
    }

    /// Loads every document in file order.
    pub fn load_documents(&self) -> io::Result<Vec<Document>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut documents = Vec::new();
        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Document>(&line) {
                Ok(document) => documents.push(document),
                Err(err) => {
                    tracing::warn!(
                        "skipping malformed line {} in {:?}: {}",
                        line_number + 1,
                        self.path,
                        err
                    );
                }
            }
        }
        tracing::info!("loaded {} documents from {:?}", documents.len(), self.path);
        Ok(documents)
    }

    /// Loads documents straight into a store, validating that every
    /// embedding shares one dimension.
    pub fn load_into_store(&self) -> io::Result<DocumentStore> {
        let documents = self.load_documents()?;
        DocumentStore::from_documents(documents)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
    }

    /// Truncates the storage file.
    pub fn clear(&self) -> io::Result<()> {
        fs::write(&self.path, b"")
    }

    /// Whether the backing file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Number of stored documents (non-blank lines). A missing file counts
    /// as zero.
    pub fn document_count(&self) -> io::Result<usize> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err),
        };
        let reader = BufReader::new(file);
        let mut count = 0;
        for line in reader.lines() {
            if !line?.trim().is_empty() {
                count += 1;
            }
        }
        Ok(count)
    }
}
