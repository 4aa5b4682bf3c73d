//! Insertion des tempêtes et observations
//!
//! Toute l'exécution tient dans une seule transaction: la moindre erreur
//! (observation invalide, violation de contrainte ou de trigger) annule
//! l'intégralité du chargement. Les observations passent par une requête
//! préparée, par lots de taille configurable, dans la transaction du run.

use rusqlite::{params, Connection};
use tracing::{debug, info};

use hurdat2::{Observation, Storm};

use crate::config::EtlConfig;
use crate::pipeline::Progress;
use crate::EtlError;

const INSERT_STORM: &str = "
    INSERT INTO storms (basin, cyclone_number, year, name)
    VALUES (?1, ?2, ?3, ?4)
";

const INSERT_OBSERVATION: &str = "
    INSERT INTO observations (
        storm_id, date, record_identifier, status,
        max_wind, min_pressure,
        ne34, se34, sw34, nw34,
        ne50, se50, sw50, nw50,
        ne64, se64, sw64, nw64,
        max_wind_radius, geom
    )
    VALUES (
        ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
        ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19,
        ST_PointFromText(?20, 4326)
    )
";

/// Bilan d'une insertion réussie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertSummary {
    pub storms: usize,
    pub observations: usize,
}

/// Insère toutes les tempêtes dans une transaction unique
///
/// # Errors
///
/// `EtlError::DatabaseInsert` portant l'identité de la tempête fautive; la
/// transaction est alors annulée et la base reste vide pour ce run.
pub fn insert_storms(
    conn: &mut Connection,
    storms: &[Storm],
    config: &EtlConfig,
    progress: &Progress,
) -> Result<InsertSummary, EtlError> {
    if storms.is_empty() {
        return Err(EtlError::DatabaseInsert {
            storm: "<none>".into(),
            reason: "no storm data provided for insertion".into(),
            source: None,
        });
    }

    let tx = conn.transaction().map_err(|e| EtlError::DatabaseInsert {
        storm: "<none>".into(),
        reason: "failed to begin transaction".into(),
        source: Some(e),
    })?;

    let summary = match insert_all(&tx, storms, config, progress) {
        Ok(summary) => summary,
        Err(e) => {
            // Rollback explicite pour clarté (implicite au drop sinon)
            if let Err(rollback_err) = tx.rollback() {
                debug!(error = %rollback_err, "Explicit rollback failed");
            }
            return Err(e);
        }
    };

    tx.commit().map_err(|e| EtlError::DatabaseInsert {
        storm: "<none>".into(),
        reason: "failed to commit transaction".into(),
        source: Some(e),
    })?;

    info!(
        storms = summary.storms,
        observations = summary.observations,
        "Insertion committed"
    );
    Ok(summary)
}

/// Corps de la transaction
fn insert_all(
    tx: &rusqlite::Transaction<'_>,
    storms: &[Storm],
    config: &EtlConfig,
    progress: &Progress,
) -> Result<InsertSummary, EtlError> {
    let mut storm_stmt = tx
        .prepare(INSERT_STORM)
        .map_err(|e| EtlError::insert("<none>", "failed to prepare storm statement", e))?;
    let mut obs_stmt = tx
        .prepare(INSERT_OBSERVATION)
        .map_err(|e| EtlError::insert("<none>", "failed to prepare observation statement", e))?;

    let total = storms.len() as u64;
    let mut observations = 0usize;

    for (done, storm) in storms.iter().enumerate() {
        // Re-vérification immédiatement avant insertion, indépendante de la
        // validation du modèle
        validate_for_insert(storm)?;

        storm_stmt
            .execute(params![
                storm.basin(),
                storm.cyclone_number(),
                storm.year(),
                storm.name(),
            ])
            .map_err(|e| {
                EtlError::insert(storm.storm_id(), "failed to insert storm record", e)
            })?;
        let storm_rowid = tx.last_insert_rowid();

        for batch in storm.observations().chunks(config.batch_size.max(1)) {
            for observation in batch {
                insert_observation(&mut obs_stmt, storm_rowid, observation)
                    .map_err(|e| {
                        EtlError::insert(
                            storm.storm_id(),
                            format!("failed to insert observation batch for {}", storm.name()),
                            e,
                        )
                    })?;
            }
            observations += batch.len();
            debug!(
                storm_id = %storm.storm_id(),
                batch = batch.len(),
                "Inserted observation batch"
            );
        }

        progress.update("load", done as u64 + 1, Some(total));
    }

    Ok(InsertSummary {
        storms: storms.len(),
        observations,
    })
}

fn insert_observation(
    stmt: &mut rusqlite::Statement<'_>,
    storm_rowid: i64,
    obs: &Observation,
) -> rusqlite::Result<()> {
    stmt.execute(params![
        storm_rowid,
        obs.date.format("%Y-%m-%dT%H:%M:%S").to_string(),
        obs.record_identifier.map(String::from),
        obs.status.as_str(),
        obs.max_wind,
        obs.min_pressure,
        obs.ne34,
        obs.se34,
        obs.sw34,
        obs.nw34,
        obs.ne50,
        obs.se50,
        obs.sw50,
        obs.nw50,
        obs.ne64,
        obs.se64,
        obs.sw64,
        obs.nw64,
        obs.max_wind_radius,
        obs.location.to_wkt(),
    ])?;
    Ok(())
}

/// Champs requis non vides, indépendamment de la validation du modèle
fn validate_for_insert(storm: &Storm) -> Result<(), EtlError> {
    if storm.basin().trim().is_empty() || storm.name().trim().is_empty() {
        return Err(EtlError::DatabaseInsert {
            storm: storm.storm_id(),
            reason: "storm has empty required fields".into(),
            source: None,
        });
    }
    Ok(())
}
