//! Initialisation du schéma SpatiaLite
//!
//! Repart de zéro à chaque exécution: la base existante au chemin cible est
//! détruite, puis tables, triggers de validation et index sont recréés.
//! Seule phase du pipeline qui tolère les fautes transitoires: la contention
//! sur un fichier de base fraîchement créé est attendue en environnement de
//! test concurrent, d'où un nombre borné de tentatives à pause fixe.

use rusqlite::Connection;
use tracing::{info, warn};

use hurdat2::{StormStatus, MISSING_VALUES};

use crate::config::{EtlConfig, ALLOWED_BASINS};
use crate::db::connection;
use crate::EtlError;

/// DDL des tables de base (la liste des bassins vient de la configuration)
fn base_tables_ddl() -> String {
    let basins = ALLOWED_BASINS
        .map(|b| format!("'{b}'"))
        .join(", ");
    format!(
        "
    CREATE TABLE storms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        basin TEXT NOT NULL,
        cyclone_number INTEGER NOT NULL,
        year INTEGER NOT NULL,
        name TEXT NOT NULL,
        UNIQUE(basin, cyclone_number, year),
        CONSTRAINT valid_basin CHECK (basin IN ({basins})),
        CONSTRAINT valid_cyclone_number CHECK (cyclone_number > 0),
        CONSTRAINT valid_year CHECK (year >= 1851)
    );

    CREATE TABLE observations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        storm_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        record_identifier TEXT,
        status TEXT NOT NULL,
        max_wind INTEGER,
        min_pressure INTEGER,
        ne34 INTEGER,
        se34 INTEGER,
        sw34 INTEGER,
        nw34 INTEGER,
        ne50 INTEGER,
        se50 INTEGER,
        sw50 INTEGER,
        nw50 INTEGER,
        ne64 INTEGER,
        se64 INTEGER,
        sw64 INTEGER,
        nw64 INTEGER,
        max_wind_radius INTEGER,
        FOREIGN KEY(storm_id) REFERENCES storms(id) ON DELETE CASCADE
    );
"
    )
}

/// Trigger de validation de la géométrie (deuxième ligne de défense après
/// la validation au niveau modèle)
const CREATE_GEOMETRY_TRIGGER: &str = "
    CREATE TRIGGER observations_geom_validate
    BEFORE INSERT ON observations
    FOR EACH ROW
    BEGIN
        SELECT CASE
            WHEN NEW.geom IS NULL THEN
                RAISE(ROLLBACK, 'Geometry cannot be null')
            WHEN GeometryType(NEW.geom) != 'POINT' THEN
                RAISE(ROLLBACK, 'Invalid geometry type')
            WHEN ST_SRID(NEW.geom) != 4326 THEN
                RAISE(ROLLBACK, 'Invalid SRID')
            WHEN ST_X(NEW.geom) < -180 OR ST_X(NEW.geom) > 180 THEN
                RAISE(ROLLBACK, 'Longitude out of range (-180 to 180)')
            WHEN ST_Y(NEW.geom) < -90 OR ST_Y(NEW.geom) > 90 THEN
                RAISE(ROLLBACK, 'Latitude out of range (-90 to 90)')
        END;
    END;
";

/// Trigger de validation des attributs (statut hors vocabulaire, négatifs
/// qui ne sont pas des sentinelles de valeur manquante)
fn attribute_trigger_ddl() -> String {
    let statuses = StormStatus::ALL
        .map(|s| format!("'{s}'"))
        .join(", ");
    let sentinels = MISSING_VALUES
        .map(|v| v.to_string())
        .join(", ");
    format!(
        "
    CREATE TRIGGER observations_validate
    BEFORE INSERT ON observations
    FOR EACH ROW
    BEGIN
        SELECT CASE
            WHEN NEW.status NOT IN ({statuses}) THEN
                RAISE(ROLLBACK, 'Invalid storm status')
            WHEN NEW.max_wind < 0 AND NEW.max_wind NOT IN ({sentinels}) THEN
                RAISE(ROLLBACK, 'Invalid max wind value')
            WHEN NEW.min_pressure < 0
                AND NEW.min_pressure NOT IN ({sentinels}) THEN
                RAISE(ROLLBACK, 'Invalid min pressure value')
        END;
    END;
"
    )
}

const CREATE_INDICES: &str = "
    CREATE INDEX idx_storms_year ON storms(year);
    CREATE INDEX idx_storms_basin ON storms(basin);
    CREATE INDEX idx_observations_date ON observations(date);
    CREATE INDEX idx_observations_status ON observations(status);
";

/// Initialise une base fraîche au chemin configuré
///
/// # Errors
///
/// `EtlError::DatabaseInit` une fois les tentatives épuisées (fautes
/// transitoires) ou immédiatement sur une erreur non transitoire.
pub fn initialize(config: &EtlConfig) -> Result<(), EtlError> {
    let mut attempt = 1;
    loop {
        match try_initialize(config) {
            Ok(()) => {
                info!(db = %config.db_path.display(), "Database initialized");
                return Ok(());
            }
            Err(e) if attempt < config.schema_init_attempts && is_transient(&e) => {
                warn!(
                    attempt,
                    max_attempts = config.schema_init_attempts,
                    error = %e,
                    "Transient failure during schema init, retrying"
                );
                std::thread::sleep(config.schema_init_backoff);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Une passe complète d'initialisation
fn try_initialize(config: &EtlConfig) -> Result<(), EtlError> {
    destroy_existing(config)?;

    let conn = connection::open(&config.db_path, &config.spatialite_module)
        .map_err(|e| EtlError::init("failed to open connection", e))?;

    init_spatial_metadata(&conn)?;
    create_base_tables(&conn)?;
    add_spatial_support(&conn)?;
    create_validation_triggers(&conn)?;
    create_indices(&conn)?;

    Ok(())
}

/// Supprime la base existante et ses fichiers annexes WAL
fn destroy_existing(config: &EtlConfig) -> Result<(), EtlError> {
    for suffix in ["", "-wal", "-shm"] {
        let mut path = config.db_path.clone().into_os_string();
        path.push(suffix);
        let path = std::path::PathBuf::from(path);
        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| EtlError::DatabaseInit {
                reason: format!("failed to remove existing database file {}: {e}", path.display()),
                source: None,
            })?;
            info!(path = %path.display(), "Removed existing database file");
        }
    }
    Ok(())
}

fn init_spatial_metadata(conn: &Connection) -> Result<(), EtlError> {
    conn.query_row("SELECT InitSpatialMetadata(1)", [], |_| Ok(()))
        .map_err(|e| EtlError::init("failed to initialize spatial metadata", e))
}

fn create_base_tables(conn: &Connection) -> Result<(), EtlError> {
    conn.execute_batch(&base_tables_ddl())
        .map_err(|e| EtlError::init("failed to create base tables", e))
}

/// Ajoute la colonne géométrie et son trigger de validation
fn add_spatial_support(conn: &Connection) -> Result<(), EtlError> {
    conn.query_row(
        "SELECT AddGeometryColumn('observations', 'geom', 4326, 'POINT', 'XY')",
        [],
        |_| Ok(()),
    )
    .map_err(|e| EtlError::init("failed to add geometry column", e))?;

    conn.execute_batch(CREATE_GEOMETRY_TRIGGER)
        .map_err(|e| EtlError::init("failed to create geometry trigger", e))
}

fn create_validation_triggers(conn: &Connection) -> Result<(), EtlError> {
    conn.execute_batch(&attribute_trigger_ddl())
        .map_err(|e| EtlError::init("failed to create validation trigger", e))
}

fn create_indices(conn: &Connection) -> Result<(), EtlError> {
    conn.execute_batch(CREATE_INDICES)
        .map_err(|e| EtlError::init("failed to create indices", e))?;

    conn.query_row("SELECT CreateSpatialIndex('observations', 'geom')", [], |_| Ok(()))
        .map_err(|e| EtlError::init("failed to create spatial index", e))
}

/// Une faute est transitoire si elle vient de la contention sur le fichier
/// (base verrouillée ou occupée, I/O système)
fn is_transient(error: &EtlError) -> bool {
    use rusqlite::ErrorCode;

    let EtlError::DatabaseInit { source: Some(e), .. } = error else {
        return false;
    };
    match e {
        rusqlite::Error::SqliteFailure(failure, _) => matches!(
            failure.code,
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::SystemIoFailure
        ),
        _ => false,
    }
}
