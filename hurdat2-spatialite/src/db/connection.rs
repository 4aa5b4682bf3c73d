//! Ouverture et configuration des connexions SQLite/SpatiaLite

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

/// Ouvre une connexion, charge l'extension SpatiaLite et applique les PRAGMA
///
/// Le module SpatiaLite est chargé avant tout le reste: les fonctions
/// spatiales (ST_PointFromText, X/Y, AddGeometryColumn...) doivent être
/// disponibles pour le schéma comme pour les requêtes.
pub fn open(db_path: &Path, spatialite_module: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;

    // Safety: le module chargé est celui de la configuration, pas une entrée
    // utilisateur; le chargement est désactivé aussitôt après.
    unsafe {
        conn.load_extension_enable()?;
        let loaded = conn.load_extension(spatialite_module, None);
        conn.load_extension_disable()?;
        loaded?;
    }

    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA cache_size = -2000;",
    )?;

    debug!(db = %db_path.display(), module = spatialite_module, "Opened SpatiaLite connection");
    Ok(conn)
}
