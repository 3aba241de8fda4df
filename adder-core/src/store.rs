//! JSON persistence for the phone pool.
//!
//! The pool is small (tens of accounts), so the whole set is rewritten on
//! each mutation: serialize to a sibling temp file, then rename over the
//! target so readers never observe a partial write.

use crate::error::PoolError;
use crate::pool::Account;
use std::fs;
use std::path::{Path, PathBuf};

pub struct PoolStore {
    path: PathBuf,
}

impl PoolStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted accounts. A missing file is an empty pool, not an
    /// error, so first boot needs no setup step.
    pub fn load(&self) -> Result<Vec<Account>, PoolError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.load_err(e))?;
        serde_json::from_str(&content).map_err(|e| self.load_err(e))
    }

    pub fn save(&self, accounts: &[&Account]) -> Result<(), PoolError> {
        let json = serde_json::to_string_pretty(accounts).map_err(|e| self.persist_err(e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.persist_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.persist_err(e))
    }

    fn load_err(&self, e: impl std::fmt::Display) -> PoolError {
        PoolError::Load {
            path: self.path.display().to_string(),
            msg: e.to_string(),
        }
    }

    fn persist_err(&self, e: impl std::fmt::Display) -> PoolError {
        PoolError::Persist {
            path: self.path.display().to_string(),
            msg: e.to_string(),
        }
    }
}
