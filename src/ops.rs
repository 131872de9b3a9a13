//! Command flows behind the CLI subcommands.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, TimeZone};
use std::path::Path;

use sealbox_core::expiry::{
    parse_offset, parse_time_of_day, resolve_spec, to_epoch_seconds, ExpirationSpec, Meridiem,
};
use sealbox_core::model::CreateSecretRequest;

use crate::client::ApiClient;
use crate::config::{Command, Config, Settings};

/// Dispatch the parsed command line.
pub async fn run(cli: Config, settings: Settings) -> Result<()> {
    let json = cli.json;
    let client = ApiClient::new(&settings)?;
    match cli.command {
        Command::Create {
            text,
            file,
            expires_in,
            expire_date,
            expire_time,
            max_views,
        } => {
            let data = read_secret_data(text, file.as_deref())?;
            let spec = expiration_from_flags(
                expires_in.as_deref(),
                expire_date,
                expire_time.as_deref(),
            )?;
            create(&client, &settings, json, data, spec, max_views).await
        }
        Command::Info { id } => info(&client, json, &id).await,
        Command::Delete { id } => delete(&client, &id).await,
    }
}

async fn create(
    client: &ApiClient,
    settings: &Settings,
    json: bool,
    data: String,
    spec: Option<ExpirationSpec>,
    max_views: u32,
) -> Result<()> {
    if data.is_empty() {
        bail!("secret is empty");
    }
    if max_views == 0 {
        bail!("--max-views must be at least 1");
    }

    let now = Local::now();
    let resolved = resolve_spec(&now, spec.as_ref(), settings.expiry.min_lead_minutes);
    let Some(instant) = resolved.submittable() else {
        bail!(
            "{}",
            resolved.validation.rejection().unwrap_or_default()
        );
    };
    let expires_at = to_epoch_seconds(instant);

    let receipt = client
        .create_secret(&CreateSecretRequest {
            data,
            expires_at,
            max_views,
        })
        .await?;
    tracing::info!(
        id = %receipt.id,
        expires = %format_epoch(expires_at),
        max_views,
        "sealed secret"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        // Just the link on stdout so it pipes cleanly.
        println!("{}", receipt.url);
    }
    Ok(())
}

async fn info(client: &ApiClient, json: bool, id: &str) -> Result<()> {
    let meta = client.secret_metadata(extract_id(id)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meta)?);
    } else {
        println!("Secret {}", meta.id);
        println!(
            "  views:   {} of {} used ({} left)",
            meta.access_count,
            meta.max_views,
            meta.views_left()
        );
        println!("  created: {}", format_epoch(meta.created_at));
        println!("  expires: {}", format_epoch(meta.expires_at));
    }
    Ok(())
}

async fn delete(client: &ApiClient, id: &str) -> Result<()> {
    let id = extract_id(id);
    client.delete_secret(id).await?;
    println!("deleted {}", id);
    Ok(())
}

/// Secret text from the positional argument, a file, or stdin.
///
/// File and stdin content drops exactly one trailing newline; the argument
/// is taken as-is.
fn read_secret_data(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read secret from {:?}", path))?;
        return Ok(strip_final_newline(content));
    }
    let piped = std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?;
    Ok(strip_final_newline(piped))
}

/// Build the expiration spec from the create flags, `None` when no
/// expiration flag was given.
fn expiration_from_flags(
    expires_in: Option<&str>,
    expire_date: Option<NaiveDate>,
    expire_time: Option<&str>,
) -> Result<Option<ExpirationSpec>> {
    if let Some(offset) = expires_in {
        let (amount, unit) = parse_offset(offset)?;
        return Ok(Some(ExpirationSpec::Relative { amount, unit }));
    }
    if let (Some(date), Some(time)) = (expire_date, expire_time) {
        let (hour12, minute, meridiem) = parse_time_of_day(time)?;
        return Ok(Some(ExpirationSpec::Absolute {
            date,
            hour12,
            minute,
            meridiem: meridiem.unwrap_or(Meridiem::Am),
        }));
    }
    Ok(None)
}

/// Accept either a bare secret id or a full share link; query strings and
/// fragments are dropped.
fn extract_id(input: &str) -> &str {
    let mut path = input.trim();
    if let Some(cut) = path.find(['?', '#']) {
        path = &path[..cut];
    }
    let path = path.trim_end_matches('/');
    path.rsplit('/').next().unwrap_or(path)
}

/// Epoch seconds rendered in local time, falling back to the raw number for
/// values outside chrono's range.
fn format_epoch(epoch: i64) -> String {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %-I:%M %p").to_string())
        .unwrap_or_else(|| epoch.to_string())
}

/// Shells add a trailing newline to heredocs and pipes; drop exactly one.
fn strip_final_newline(mut data: String) -> String {
    if data.ends_with('\n') {
        data.pop();
        if data.ends_with('\r') {
            data.pop();
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealbox_core::expiry::OffsetUnit;

    #[test]
    fn test_extract_id_variants() {
        assert_eq!(extract_id("s-42"), "s-42");
        assert_eq!(extract_id("https://share.example/s/s-42"), "s-42");
        assert_eq!(extract_id("https://share.example/s/s-42/"), "s-42");
        assert_eq!(extract_id("  s-42 "), "s-42");
        assert_eq!(
            extract_id("https://share.example/s/s-42?exp=1760000000"),
            "s-42"
        );
        assert_eq!(extract_id("https://share.example/s/s-42#view"), "s-42");
    }

    #[test]
    fn test_expiration_from_offset_flag() {
        let spec = expiration_from_flags(Some("45m"), None, None).unwrap();
        assert_eq!(
            spec,
            Some(ExpirationSpec::Relative {
                amount: 45,
                unit: OffsetUnit::Minutes,
            })
        );
    }

    #[test]
    fn test_expiration_from_date_flags_defaults_to_am() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let spec = expiration_from_flags(None, Some(date), Some("5:30")).unwrap();
        assert_eq!(
            spec,
            Some(ExpirationSpec::Absolute {
                date,
                hour12: 5,
                minute: 30,
                meridiem: Meridiem::Am,
            })
        );
    }

    #[test]
    fn test_expiration_suffix_wins() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let spec = expiration_from_flags(None, Some(date), Some("5:30 pm")).unwrap();
        assert_eq!(
            spec,
            Some(ExpirationSpec::Absolute {
                date,
                hour12: 5,
                minute: 30,
                meridiem: Meridiem::Pm,
            })
        );
    }

    #[test]
    fn test_no_flags_is_no_spec() {
        assert_eq!(expiration_from_flags(None, None, None).unwrap(), None);
    }

    #[test]
    fn test_bad_offset_is_hard_error() {
        assert!(expiration_from_flags(Some("soon"), None, None).is_err());
    }

    #[test]
    fn test_strip_final_newline() {
        assert_eq!(strip_final_newline("secret\n".to_string()), "secret");
        assert_eq!(strip_final_newline("secret\r\n".to_string()), "secret");
        assert_eq!(strip_final_newline("secret".to_string()), "secret");
        assert_eq!(strip_final_newline("two\nlines\n".to_string()), "two\nlines");
    }

    #[test]
    fn test_file_secret_drops_trailing_newline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("secret.txt");
        std::fs::write(&path, "hunter2\n").expect("write secret");
        assert_eq!(
            read_secret_data(None, Some(path.as_path())).unwrap(),
            "hunter2"
        );

        std::fs::write(&path, "no newline").expect("write secret");
        assert_eq!(
            read_secret_data(None, Some(path.as_path())).unwrap(),
            "no newline"
        );
    }

    #[test]
    fn test_text_argument_is_verbatim() {
        let data = read_secret_data(Some("keep\n".to_string()), None).unwrap();
        assert_eq!(data, "keep\n");
    }

    #[test]
    fn test_format_epoch_out_of_range_falls_back() {
        assert_eq!(format_epoch(i64::MAX), i64::MAX.to_string());
    }
}
