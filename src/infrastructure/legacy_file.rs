// Local legacy chart collection, one JSON array file per owner
use crate::application::chart_store::LegacyChartStore;
use crate::domain::saved_chart::NewChart;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LegacyChartFile {
    path: PathBuf,
}

impl LegacyChartFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<directory>/<owner_id>.json`; owner ids are limited to `[A-Za-z0-9_-]`
    pub fn for_owner(directory: &Path, owner_id: &str) -> Result<Self> {
        if owner_id.is_empty()
            || !owner_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            anyhow::bail!("Invalid owner id '{}'", owner_id);
        }
        Ok(Self::new(directory.join(format!("{}.json", owner_id))))
    }
}

#[async_trait]
impl LegacyChartStore for LegacyChartFile {
    async fn load(&self) -> Result<Vec<NewChart>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse legacy charts in {}", self.path.display()))
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = LegacyChartFile::new(dir.path().join("nadie.json"));
        assert!(file.load().await.unwrap().is_empty());
        file.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_load_then_clear() {
        let dir = tempfile::tempdir().unwrap();
        let file = LegacyChartFile::for_owner(dir.path(), "ana").unwrap();
        std::fs::write(
            dir.path().join("ana.json"),
            r#"[{"name": "Local", "series": [], "yearsFilter": 3, "temporalView": "monthly"}]"#,
        )
        .unwrap();

        let charts = file.load().await.unwrap();
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].years_filter, Some(3));

        file.clear().await.unwrap();
        assert!(file.load().await.unwrap().is_empty());
    }

    #[test]
    fn test_owner_ids_map_to_distinct_files() {
        let dir = Path::new("/data/legacy");
        let file = LegacyChartFile::for_owner(dir, "user_42-b").unwrap();
        assert_eq!(file.path, PathBuf::from("/data/legacy/user_42-b.json"));

        // ids that would collide after stripping characters are rejected
        assert!(LegacyChartFile::for_owner(dir, "ana.b").is_err());
        let anab = LegacyChartFile::for_owner(dir, "anab").unwrap();
        assert_eq!(anab.path, PathBuf::from("/data/legacy/anab.json"));
    }

    #[test]
    fn test_owner_id_cannot_escape_directory() {
        let dir = Path::new("/data/legacy");
        assert!(LegacyChartFile::for_owner(dir, "../../etc/passwd").is_err());
        assert!(LegacyChartFile::for_owner(dir, "../").is_err());
        assert!(LegacyChartFile::for_owner(dir, "").is_err());
    }
}
