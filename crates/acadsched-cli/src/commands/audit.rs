//! `acadsched audit` command implementation.

use anyhow::{Context, Result, bail};

use acadsched_audit::{ActionType, AuditEntry, AuditFilter, AuditRecorder};
use acadsched_core::AcadschedConfig;

/// Build a listing filter from command-line options.
pub fn build_filter(
    entity: Option<String>,
    action: Option<&str>,
    user: Option<String>,
    limit: Option<usize>,
) -> Result<AuditFilter> {
    let action_type = action.map(parse_action).transpose()?;

    Ok(AuditFilter {
        entity_type: entity,
        action_type,
        user_email: user,
        limit,
        offset: None,
    })
}

/// Parse a `--action` value, ignoring case.
fn parse_action(value: &str) -> Result<ActionType> {
    match value.to_ascii_uppercase().as_str() {
        "CREATE" => Ok(ActionType::Create),
        "UPDATE" => Ok(ActionType::Update),
        "DELETE" => Ok(ActionType::Delete),
        _ => bail!(
            "Invalid --action '{}', expected CREATE, UPDATE or DELETE",
            value
        ),
    }
}

/// Print the entries matching `filter` from the configured storage.
pub async fn list(config: &AcadschedConfig, filter: AuditFilter, json: bool) -> Result<()> {
    let recorder = AuditRecorder::from_config(&config.audit)
        .await
        .context("Failed to open audit storage")?;

    let entries = recorder.list(filter).await.context("Failed to read audit entries")?;
    tracing::debug!(count = entries.len(), "Audit entries loaded");

    println!("{}", render(&entries, json)?);
    Ok(())
}

fn render(entries: &[AuditEntry], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(entries)?);
    }

    if entries.is_empty() {
        return Ok("No audit entries.".to_string());
    }

    Ok(entries
        .iter()
        .map(AuditEntry::to_log_line)
        .collect::<Vec<_>>()
        .join("\n"))
}
