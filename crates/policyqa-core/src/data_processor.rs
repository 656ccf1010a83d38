use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::chunker::{Chunker, ChunkingConfig};
use crate::error::{Error, Result};
use crate::seed::write_seed_documents;
use crate::traits::TextExtractor;
use crate::types::{Chunk, Document};

/// Reads text files as UTF-8, replacing invalid sequences.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extensions(&self) -> &[&str] {
        &["txt", "md", "pdf"]
    }

    fn extract(&self, path: &Path) -> Result<String> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(content),
            Err(_) => {
                let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
                Ok(String::from_utf8_lossy(&bytes).to_string())
            }
        }
    }
}

pub struct DataProcessor {
    chunker: Chunker,
    extractor: Box<dyn TextExtractor>,
}

impl DataProcessor {
    pub fn new(chunking: ChunkingConfig) -> Result<Self> {
        Ok(Self { chunker: Chunker::new(chunking)?, extractor: Box::new(PlainTextExtractor) })
    }

    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Load every supported file under `data_dir`, seeding the sample policies
    /// first when the directory does not exist. Files that fail extraction are
    /// skipped.
    pub fn load_documents(&self, data_dir: &Path) -> Result<Vec<Document>> {
        if !data_dir.exists() {
            write_seed_documents(data_dir)?;
        }
        let files = self.list_files(data_dir);
        if files.is_empty() {
            warn!(dir = %data_dir.display(), "no supported documents found");
            return Ok(vec![]);
        }
        let mut documents = Vec::with_capacity(files.len());
        for file_path in &files {
            match self.extractor.extract(file_path) {
                Ok(text) => documents.push(Document::new(extract_doc_id(file_path), file_path.clone(), text)),
                Err(e) => warn!(path = %file_path.display(), error = %e, "skipping unreadable document"),
            }
        }
        info!(dir = %data_dir.display(), documents = documents.len(), "loaded documents");
        Ok(documents)
    }

    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = documents.iter().flat_map(|d| self.chunker.split_document(d)).collect();
        info!(documents = documents.len(), chunks = chunks.len(), "chunked documents");
        chunks
    }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<Chunk>> {
        let documents = self.load_documents(data_dir)?;
        Ok(self.chunk_documents(&documents))
    }

    fn list_files(&self, root: &Path) -> Vec<PathBuf> {
        let extensions = self.extractor.extensions();
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase().as_str()))
            })
            .collect();
        files.sort();
        files
    }
}

fn extract_doc_id(file_path: &Path) -> String {
    file_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string())
}
