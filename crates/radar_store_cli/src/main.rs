//! CLI smoke entry point.
//!
//! Usage: `radar_store_cli [DB_PATH]`. Without a path, prints the core
//! version. With a path, opens (and migrates) the database and lists radars
//! by id, one per line.

use radar_store_core::db::open_db;
use radar_store_core::{core_version, RadarRepository, SqliteRadarRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("radar_store_core version={}", core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match list_radars(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn list_radars(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let repo = SqliteRadarRepository::try_new(&conn)?;
    for record in repo.list_all_by_id()? {
        let group_type = record
            .group_type
            .map_or_else(|| "-".to_string(), |value| value.to_string());
        println!(
            "{}\t{}\t{}\t{}",
            record.radar.id.map_or(0, |id| id.get()),
            record.radar.name,
            record.radar.address(),
            group_type
        );
    }
    Ok(())
}
