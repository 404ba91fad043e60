// WHY: GRID-style registry snapshot model; fields stay optional so one broken record
// is skipped at index build instead of rejecting the whole snapshot at parse time

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Relationship kind whose target is treated as the parent institution
pub const PARENT_RELATIONSHIP: &str = "Parent";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso639: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// One institution as published in the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstituteRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub addresses: Option<Vec<Address>>,
}

impl InstituteRecord {
    /// First declared parent, if any
    pub fn parent_id(&self) -> Option<&str> {
        self.relationships
            .iter()
            .find(|rel| rel.kind == PARENT_RELATIONSHIP)
            .map(|rel| rel.id.as_str())
    }

    /// Country of the first address
    pub fn country(&self) -> Option<&str> {
        self.addresses
            .as_ref()
            .and_then(|addresses| addresses.first())
            .and_then(|address| address.country.as_deref())
            .filter(|country| !country.is_empty())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Has everything index construction needs
    pub fn is_indexable(&self) -> bool {
        !self.id.is_empty() && self.display_name().is_some() && self.country().is_some()
    }
}

/// Full registry snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub institutes: Vec<InstituteRecord>,
}

impl Registry {
    pub fn from_json_str(content: &str) -> Result<Self> {
        let registry: Self = serde_json::from_str(content)?;
        registry.ensure_not_empty()?;
        Ok(registry)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let registry: Self = serde_json::from_reader(reader)?;
        registry.ensure_not_empty()?;
        Ok(registry)
    }

    /// Load the snapshot from disk
    /// Missing or empty snapshots are fatal, there is no degraded mode
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Registry snapshot does not exist: {}", path.display());
        }

        let start_time = std::time::Instant::now();
        let content = fs::read_to_string(path).await?;
        let registry = Self::from_json_str(&content)?;

        info!(
            "Loaded {} institutes from {} in {}ms",
            registry.institutes.len(),
            path.display(),
            start_time.elapsed().as_millis()
        );

        Ok(registry)
    }

    fn ensure_not_empty(&self) -> Result<()> {
        if self.institutes.is_empty() {
            anyhow::bail!("Registry snapshot contains no institutes");
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.institutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.institutes.is_empty()
    }
}
