//! `acadsched check` command implementation.
//!
//! Loading already validates the configuration; this prints what it resolves
//! to so operators can confirm which services are audited and where entries
//! go.

use anyhow::Result;
use std::path::Path;

use acadsched_core::{AcadschedConfig, StorageBackend};

pub fn run(path: &Path, config: &AcadschedConfig) -> Result<()> {
    println!("{}", summary(path, config));
    Ok(())
}

fn summary(path: &Path, config: &AcadschedConfig) -> String {
    let audit = &config.audit;
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };

    let storage = match audit.storage.backend {
        StorageBackend::Memory => "memory".to_string(),
        StorageBackend::File => format!("file {}", audit.storage.resolved_file_path()),
        StorageBackend::Sqlite => format!(
            "sqlite {}",
            audit.storage.database_url.as_deref().unwrap_or_default()
        ),
    };

    let mut lines = vec![
        format!("Configuration: {}", source),
        format!("Audit enabled: {}", audit.enabled),
        format!("Dispatch: {:?}", audit.dispatch),
        format!("Storage: {}", storage),
        format!("Default principal: {}", audit.default_principal),
        format!("Max argument length: {}", audit.max_argument_length),
        "Monitored services:".to_string(),
    ];
    lines.extend(audit.monitored_services.iter().map(|s| format!("  - {}", s)));
    lines.push("Configuration OK".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_summary_defaults() {
        let text = summary(Path::new("missing.yaml"), &AcadschedConfig::default());
        assert!(text.contains("missing.yaml (not found, using defaults)"));
        assert!(text.contains("Storage: memory"));
        assert!(text.contains("  - FacultyService"));
        assert!(text.contains("  - ConstraintService"));
        assert!(text.ends_with("Configuration OK"));
    }

    #[test]
    fn test_summary_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acadsched.yaml");
        fs::write(
            &path,
            "audit:\n  storage:\n    backend: file\n    file_path: trail.log\n  monitored_services: [RoomService]\n",
        )
        .unwrap();

        let config = crate::commands::load_config(&path).unwrap();
        let text = summary(&path, &config);
        assert!(text.contains("Storage: file trail.log"));
        assert!(text.contains("  - RoomService"));
        assert!(!text.contains("FacultyService"));
    }
}
