mod cli;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;

use backupvault_core::{paths, schedule, BackupConfig, ConfigStore, HistoryStore, VaultPaths};

use crate::cli::{CliArgs, Command, SetArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    paths::load_dotenv();
    let args = CliArgs::parse();
    let paths = match &args.dir {
        Some(dir) => VaultPaths::new(dir),
        None => VaultPaths::from_env(),
    };

    match args.command {
        Command::Show => show(&paths),
        Command::Set(set) => set_fields(&paths, set),
        Command::Validate => validate(&paths),
        Command::NextRun => next_run_preview(&paths),
    }
}

fn show(paths: &VaultPaths) -> Result<()> {
    let store = ConfigStore::new(paths);
    let config = store
        .load()
        .context("failed to read configuration")?
        .unwrap_or_default();
    print!("{}", config.to_conf_text());
    Ok(())
}

fn set_fields(paths: &VaultPaths, set: SetArgs) -> Result<()> {
    let store = ConfigStore::new(paths);
    let mut config = store
        .load()
        .context("failed to read configuration")?
        .unwrap_or_default();

    apply_set_args(&mut config, set);
    config.normalize();

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("error: {issue}");
        }
        bail!("configuration not saved ({} validation issue(s))", issues.len());
    }

    store.save(&config).context("failed to save configuration")?;
    println!("Configuration saved: {}", store.path().display());
    Ok(())
}

fn apply_set_args(config: &mut BackupConfig, set: SetArgs) {
    if let Some(v) = set.job_name {
        config.job_name = v;
    }
    if let Some(v) = set.source_folders {
        config.source_folders = v;
    }
    if let Some(v) = set.destination {
        config.destination_directory = v;
    }
    if let Some(v) = set.frequency {
        config.frequency = v;
    }
    if let Some(v) = set.cron {
        config.custom_cron_schedule = v;
    }
    if let Some(v) = set.compression {
        config.compression = v;
    }
    if let Some(v) = set.backup_mode {
        config.backup_mode = v;
    }
    if let Some(v) = set.retention_days {
        config.retention_days = v;
    }
    if let Some(v) = set.encryption {
        config.encryption = v;
    }
    if let Some(v) = set.gpg_recipient {
        config.gpg_recipient = v;
    }
    if let Some(v) = set.email_notify {
        config.email_notify = v;
    }
    if let Some(v) = set.email_address {
        config.email_address = v;
    }
    if let Some(v) = set.email_subject_prefix {
        config.email_subject_prefix = v;
    }
    if let Some(v) = set.cloud_backup {
        config.cloud_backup_enabled = v;
    }
    if let Some(v) = set.rclone_remote_name {
        config.rclone_remote_name = v;
    }
    if let Some(v) = set.rclone_remote_path {
        config.rclone_remote_path = v;
    }
    if let Some(v) = set.delete_local_after_upload {
        config.delete_local_after_upload = v;
    }
}

fn validate(paths: &VaultPaths) -> Result<()> {
    let store = ConfigStore::new(paths);
    match store.load().context("failed to read configuration")? {
        None => {
            println!("No configuration file at {}", store.path().display());
            Ok(())
        }
        Some(config) => {
            let issues = config.validate();
            if issues.is_empty() {
                println!("Configuration OK");
                return Ok(());
            }
            for issue in &issues {
                eprintln!("error: {issue}");
            }
            bail!("{} validation issue(s)", issues.len());
        }
    }
}

fn next_run_preview(paths: &VaultPaths) -> Result<()> {
    let config = ConfigStore::new(paths)
        .load()
        .context("failed to read configuration")?;
    let history = HistoryStore::new(paths)
        .load()
        .context("failed to read run history")?;

    let last_run = history
        .first()
        .and_then(|run| run.start_time)
        .map(|at| at.with_timezone(&Local));

    let result = match &config {
        Some(cfg) => schedule::next_run(
            last_run,
            Some(cfg.frequency.as_str()),
            Some(cfg.custom_cron_schedule.as_str()),
            Local::now(),
        ),
        None => schedule::next_run(last_run, None, None, Local::now()),
    };
    println!("{}", result.display_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_args_only_touch_named_fields() {
        let mut config = BackupConfig::default();
        apply_set_args(
            &mut config,
            SetArgs {
                source_folders: Some("/data:/home".to_string()),
                email_notify: Some(true),
                email_address: Some("ops@example.com".to_string()),
                ..SetArgs::default()
            },
        );
        assert_eq!(config.source_folders, "/data:/home");
        assert!(config.email_notify);
        assert_eq!(config.email_address, "ops@example.com");
        // Untouched fields keep their defaults.
        assert_eq!(config.job_name, BackupConfig::default().job_name);
        assert_eq!(config.retention_days, BackupConfig::default().retention_days);
    }

    #[test]
    fn set_then_load_round_trips_through_the_store() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = VaultPaths::new(tmp.path());

        set_fields(
            &paths,
            SetArgs {
                source_folders: Some("/data".to_string()),
                frequency: Some("weekly".to_string()),
                ..SetArgs::default()
            },
        )
        .unwrap();

        let saved = ConfigStore::new(&paths).load().unwrap().unwrap();
        assert_eq!(saved.source_folders, "/data");
        assert_eq!(saved.frequency, "weekly");
        // Normalization wrote the canonical weekly cron string.
        assert_eq!(saved.custom_cron_schedule, "0 2 * * 0");
    }

    #[test]
    fn invalid_set_refuses_to_save() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = VaultPaths::new(tmp.path());

        // Missing source folders: save must be refused and no file written.
        assert!(set_fields(&paths, SetArgs::default()).is_err());
        assert!(ConfigStore::new(&paths).load().unwrap().is_none());
    }
}
