use std::path::Path;

use serde_json::json;

use crate::db::{connection, migrations};
use crate::error::LifeorgError;
use crate::output;

pub fn run(db_path: &Path, json_output: bool) -> i32 {
    super::finish(run_inner(db_path, json_output), json_output)
}

fn run_inner(db_path: &Path, json_output: bool) -> Result<i32, LifeorgError> {
    let conn = connection::open_db(db_path)?;
    let version = migrations::schema_version(&conn)?;
    if json_output {
        output::json::print(&output::json::success(json!({
            "path": db_path.to_string_lossy(),
            "schema_version": version
        })));
    } else {
        println!("Initialized lifeorg at {}", db_path.display());
    }
    Ok(0)
}
