use std::path::Path;

use serde_json::json;
use tracing::info;

use crate::cli::commands::SettingsCommands;
use crate::db::{connection, settings_repo};
use crate::error::LifeorgError;
use crate::models::{Setting, SettingKey};
use crate::output;

const MAX_MINUTES: u32 = 24 * 60;

pub fn run(cmd: SettingsCommands, db_path: &Path, json_output: bool) -> i32 {
    let result = match cmd {
        SettingsCommands::List => run_list(db_path, json_output),
        SettingsCommands::Get { key } => run_get(key, db_path, json_output),
        SettingsCommands::Set { key, minutes } => run_set(key, minutes, db_path, json_output),
    };
    super::finish(result, json_output)
}

fn run_list(db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    let durations = settings_repo::load_timer_durations(&conn)?;
    let stored = settings_repo::list_settings(&conn)?;

    if json_output {
        let entries: serde_json::Map<_, _> = stored
            .into_iter()
            .map(|s| (s.key, s.value))
            .collect();
        output::json::print(&output::json::success(json!({
            "durations": durations,
            "settings": entries
        })));
    } else {
        for key in SettingKey::ALL {
            let is_default = !stored.iter().any(|s| s.key == key.as_str());
            println!(
                "{:<12} {:>4} min{}",
                key.as_str(),
                durations.minutes(key),
                if is_default { " (default)" } else { "" }
            );
        }
    }
    Ok(0)
}

fn run_get(key: SettingKey, db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    let durations = settings_repo::load_timer_durations(&conn)?;
    let stored = settings_repo::get_setting(&conn, key.as_str())?;
    let minutes = durations.minutes(key);

    if json_output {
        output::json::print(&output::json::success(json!({
            "key": key.as_str(),
            "minutes": minutes,
            "default": stored.is_none()
        })));
    } else {
        println!("{minutes}");
    }
    Ok(0)
}

fn run_set(
    key: SettingKey,
    minutes: u32,
    db_path: &Path,
    json_output: bool,
) -> Result<i32, LifeorgError> {
    if minutes == 0 || minutes > MAX_MINUTES {
        return Err(LifeorgError::validation(format!(
            "{} must be between 1 and {MAX_MINUTES} minutes",
            key.as_str()
        )));
    }

    let conn = connection::open_db(db_path)?;
    settings_repo::put_setting(&conn, &Setting::new(key.as_str(), json!(minutes)))?;
    info!(key = key.as_str(), minutes, "setting updated");

    if json_output {
        output::json::print(&output::json::success(json!({
            "key": key.as_str(),
            "minutes": minutes
        })));
    } else {
        println!("{} set to {minutes} min", key.as_str());
    }
    Ok(0)
}
