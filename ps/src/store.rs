//! Core PlanStore implementation

use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Unique identifier for a saved plan
pub type PlanId = String;

/// Metadata for a saved plan, returned by [`PlanStore::list`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPlanMeta {
    /// Unique plan ID (UUIDv7 - sortable by insertion time)
    pub id: PlanId,
    /// When the plan was saved
    pub saved_at: DateTime<Utc>,
    /// One-line description, e.g. "28yo male, weight loss, 7 days"
    pub summary: String,
    /// Total cost of the plan
    pub total_cost: f64,
    /// Number of days in the plan
    pub days: u32,
}

/// A saved plan: metadata plus the opaque plan document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPlan {
    pub meta: SavedPlanMeta,
    /// The plan payload as stored by the client
    pub plan: serde_json::Value,
}

/// The plan store
pub struct PlanStore {
    /// Base path for storage
    base_path: PathBuf,
}

impl PlanStore {
    /// Open or create a plan store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;
        debug!(?base_path, "Opened plan store");
        Ok(Self { base_path })
    }

    /// Save a plan, evicting the oldest saved plan if the cap is exceeded
    ///
    /// Returns the new plan's ID.
    pub fn save(&self, summary: &str, days: u32, total_cost: f64, plan: serde_json::Value) -> Result<PlanId> {
        let id = Uuid::now_v7().to_string();
        let saved = SavedPlan {
            meta: SavedPlanMeta {
                id: id.clone(),
                saved_at: Utc::now(),
                summary: summary.to_string(),
                total_cost,
                days,
            },
            plan,
        };

        let content = serde_json::to_string_pretty(&saved)?;
        fs::write(self.plan_path(&id), content).context("Failed to write plan file")?;

        // FIFO cap: drop oldest entries until we're back at the limit
        let mut metas = self.list()?;
        while metas.len() > crate::MAX_SAVED_PLANS {
            let oldest = metas.remove(0);
            self.delete(&oldest.id)?;
            info!(evicted = %oldest.id, "Evicted oldest plan to stay within cap");
        }

        info!(%id, summary, "Saved plan");
        Ok(id)
    }

    /// Load a saved plan by ID, or None if it doesn't exist
    pub fn load(&self, id: &str) -> Result<Option<SavedPlan>> {
        let path = self.plan_path(id);
        if !path.exists() {
            debug!(%id, "Plan not found");
            return Ok(None);
        }

        let content = fs::read_to_string(&path).context("Failed to read plan file")?;
        let saved: SavedPlan = serde_json::from_str(&content).context("Failed to parse plan file")?;
        Ok(Some(saved))
    }

    /// Delete a saved plan by ID
    ///
    /// Returns true if a plan was deleted, false if no plan had that ID.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let path = self.plan_path(id);
        if !path.exists() {
            warn!(%id, "Delete requested for unknown plan");
            return Ok(false);
        }

        fs::remove_file(&path).context("Failed to remove plan file")?;
        info!(%id, "Deleted plan");
        Ok(true)
    }

    /// List metadata for all saved plans, oldest first (insertion order)
    pub fn list(&self) -> Result<Vec<SavedPlanMeta>> {
        let mut metas = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let content = fs::read_to_string(&path)?;
                match serde_json::from_str::<SavedPlan>(&content) {
                    Ok(saved) => metas.push(saved.meta),
                    Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable plan file"),
                }
            }
        }

        // UUIDv7 ids sort by creation time
        metas.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(metas)
    }

    /// Delete all saved plans
    pub fn clear(&self) -> Result<()> {
        for meta in self.list()? {
            self.delete(&meta.id)?;
        }
        info!("Cleared all saved plans");
        Ok(())
    }

    fn plan_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }
}
