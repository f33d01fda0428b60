use crate::core::SessionStore;
use crate::utils::error::{DispatchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    values: HashMap<String, String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionDocument {
    updated_at: Option<DateTime<Utc>>,
    values: HashMap<String, String>,
}

/// 將 session 存成 JSON 檔，讓 CLI 在多次執行之間記住操作員上次的選擇
#[derive(Debug, Clone)]
pub struct JsonFileSession {
    path: PathBuf,
    document: SessionDocument,
}

impl JsonFileSession {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let document = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| DispatchError::Session {
                message: format!("{} is not a valid session file: {}", path.display(), e),
            })?
        } else {
            SessionDocument::default()
        };

        tracing::debug!("Session loaded from {}", path.display());
        Ok(Self { path, document })
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.document.updated_at
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.document)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SessionStore for JsonFileSession {
    fn get(&self, key: &str) -> Option<String> {
        self.document.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.document
            .values
            .insert(key.to_string(), value.to_string());
        self.document.updated_at = Some(Utc::now());
        self.save()
    }
}
