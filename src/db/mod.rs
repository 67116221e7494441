use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;

pub mod store;

pub use store::{SessionStore, StoreError};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

pub fn init_db(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut conn = Connection::open(db_path)?;

    run_migrations(&mut conn)?;

    Ok(conn)
}

pub(crate) fn run_migrations(conn: &mut Connection) -> Result<()> {
    let report = embedded::migrations::runner().run(conn)?;
    for migration in report.applied_migrations() {
        log::info!("Applied migration {}", migration);
    }
    Ok(())
}
