//! Tests d'intégration avec une vraie base SpatiaLite
//!
//! Ces tests exigent que le module SpatiaLite soit chargeable (paquet
//! système `mod_spatialite`, ou chemin via SPATIALITE_LIBRARY_PATH). S'il ne
//! l'est pas, chaque test s'arrête avec un message, sans échec.

use std::io::Write;

use tempfile::TempDir;

use hurdat2::parser::parse_observation;
use hurdat2::Storm;
use hurdat2_spatialite::db::{connection, insert, schema, validate};
use hurdat2_spatialite::pipeline::{self, Progress};
use hurdat2_spatialite::{EtlConfig, EtlError};

/// Configuration isolée dans un répertoire temporaire
fn test_config(dir: &TempDir) -> EtlConfig {
    let mut config = EtlConfig::from_env();
    config.db_path = dir.path().join("test.db");
    config
}

/// Vérifie que le module SpatiaLite de la configuration est chargeable
fn spatialite_loadable(config: &EtlConfig) -> bool {
    let Ok(conn) = rusqlite::Connection::open_in_memory() else {
        return false;
    };
    unsafe {
        conn.load_extension_enable().is_ok()
            && conn
                .load_extension(&config.spatialite_module, None::<&str>)
                .is_ok()
    }
}

fn karen_observation(line: &str) -> hurdat2::Observation {
    parse_observation(line).unwrap()
}

/// Tempête à deux observations (TD puis TS, Atlantique est)
fn two_observation_storm() -> Storm {
    Storm::new(
        "AL",
        12,
        2007,
        "KAREN",
        vec![
            karen_observation(
                "20070925, 0000,, TD, 10.0N, 35.9W, 30, 1006, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, -999",
            ),
            karen_observation(
                "20070925, 0600,, TS, 10.3N, 37.0W, 35, 1005, 40, 30, 0, 40, 0, 0, 0, 0, 0, 0, 0, 0, -999",
            ),
        ],
    )
    .unwrap()
}

#[test]
fn test_schema_objects_present() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    if !spatialite_loadable(&config) {
        eprintln!("SpatiaLite module not loadable, skipping test");
        return;
    }

    schema::initialize(&config).unwrap();
    let conn = connection::open(&config.db_path, &config.spatialite_module).unwrap();
    let objects = validate::schema_objects(&conn).unwrap();

    let names: Vec<&str> = objects.iter().map(|o| o.name.as_str()).collect();
    for expected in [
        "storms",
        "observations",
        "observations_geom_validate",
        "observations_validate",
        "idx_storms_year",
        "idx_storms_basin",
        "idx_observations_date",
        "idx_observations_status",
    ] {
        assert!(names.contains(&expected), "missing schema object {expected}");
    }
}

#[test]
fn test_initialize_destroys_previous_database() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    if !spatialite_loadable(&config) {
        eprintln!("SpatiaLite module not loadable, skipping test");
        return;
    }

    schema::initialize(&config).unwrap();
    {
        let mut conn = connection::open(&config.db_path, &config.spatialite_module).unwrap();
        insert::insert_storms(
            &mut conn,
            &[two_observation_storm()],
            &config,
            &Progress::disabled(),
        )
        .unwrap();
    }

    // Deuxième initialisation: repart de zéro
    schema::initialize(&config).unwrap();
    let conn = connection::open(&config.db_path, &config.spatialite_module).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM storms", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_load_round_trip_basin_coverage() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    if !spatialite_loadable(&config) {
        eprintln!("SpatiaLite module not loadable, skipping test");
        return;
    }

    schema::initialize(&config).unwrap();
    let mut conn = connection::open(&config.db_path, &config.spatialite_module).unwrap();
    let summary = insert::insert_storms(
        &mut conn,
        &[two_observation_storm()],
        &config,
        &Progress::disabled(),
    )
    .unwrap();
    assert_eq!(summary.storms, 1);
    assert_eq!(summary.observations, 2);

    let basins = validate::basin_coverage(&conn).unwrap();
    assert_eq!(basins.len(), 1);
    assert_eq!(basins[0].basin, "AL");
    assert_eq!(basins[0].storm_count, 1);
    assert_eq!(basins[0].first_year, 2007);
    assert_eq!(basins[0].avg_observations_per_storm, 2.0);

    // 30 kt -> TD, 35 kt -> TS
    let mut buckets = validate::intensity_distribution(&conn).unwrap();
    buckets.sort_by(|a, b| a.category.cmp(&b.category));
    let categories: Vec<(&str, i64)> = buckets
        .iter()
        .map(|b| (b.category.as_str(), b.count))
        .collect();
    assert_eq!(categories, vec![("TD", 1), ("TS", 1)]);
    assert_eq!(buckets[0].earliest_year, "2007");
}

#[test]
fn test_missing_sentinels_stored_as_null() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    if !spatialite_loadable(&config) {
        eprintln!("SpatiaLite module not loadable, skipping test");
        return;
    }

    schema::initialize(&config).unwrap();
    let mut conn = connection::open(&config.db_path, &config.spatialite_module).unwrap();

    // max_wind et min_pressure manquants dans la source (-99 / -999)
    let storm = Storm::new(
        "AL",
        3,
        1999,
        "UNNAMED",
        vec![karen_observation(
            "19990801, 1200,, LO, 20.0N, 40.0W, -99, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999",
        )],
    )
    .unwrap();
    insert::insert_storms(&mut conn, &[storm], &config, &Progress::disabled()).unwrap();

    let (max_wind, min_pressure, ne34): (Option<i64>, Option<i64>, Option<i64>) = conn
        .query_row(
            "SELECT max_wind, min_pressure, ne34 FROM observations",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(max_wind, None);
    assert_eq!(min_pressure, None);
    assert_eq!(ne34, None);
}

#[test]
fn test_basin_check_violation_rolls_back_run() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    if !spatialite_loadable(&config) {
        eprintln!("SpatiaLite module not loadable, skipping test");
        return;
    }

    schema::initialize(&config).unwrap();
    let mut conn = connection::open(&config.db_path, &config.spatialite_module).unwrap();

    // Le modèle accepte XX (deux lettres majuscules); la contrainte CHECK
    // du schéma est la deuxième ligne de défense
    let bad_basin = Storm::new(
        "XX",
        1,
        2007,
        "ROGUE",
        vec![karen_observation(
            "20070925, 0000,, TD, 10.0N, 35.9W, 30, 1006, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, -999",
        )],
    )
    .unwrap();

    let err = insert::insert_storms(
        &mut conn,
        &[two_observation_storm(), bad_basin],
        &config,
        &Progress::disabled(),
    )
    .unwrap_err();

    match err {
        EtlError::DatabaseInsert { ref storm, .. } => assert_eq!(storm, "XX012007"),
        other => panic!("unexpected error: {other}"),
    }

    // Une seule transaction par exécution: rien n'est visible, pas même la
    // tempête valide insérée avant l'échec
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM storms", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_full_pipeline_from_file() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    if !spatialite_loadable(&config) {
        eprintln!("SpatiaLite module not loadable, skipping test");
        return;
    }

    config.input_path = dir.path().join("input.txt");
    let mut file = std::fs::File::create(&config.input_path).unwrap();
    writeln!(file, "AL122007,              KAREN,      2,").unwrap();
    writeln!(
        file,
        "20070925, 0000,  , TD, 10.0N,  35.9W,  30, 1006,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0, -999"
    )
    .unwrap();
    writeln!(
        file,
        "20070925, 0600,  , TS, 10.3N,  37.0W,  35, 1005,   40,   30,    0,   40,    0,    0,    0,    0,    0,    0,    0,    0, -999"
    )
    .unwrap();
    drop(file);

    let outcome = pipeline::run(
        hurdat2_spatialite::extract::Extract::new(config.clone()),
        hurdat2_spatialite::transform::Transform::new(config.bounds),
        hurdat2_spatialite::load::Load::new(config.clone()),
        &Progress::disabled(),
    )
    .unwrap();

    assert_eq!(outcome.storms, 1);
    assert_eq!(outcome.observations, 2);

    let spatial = outcome.report.spatial.expect("spatial coverage");
    assert_eq!(spatial.total_observations, 2);
    assert_eq!(spatial.total_storms, 1);
    assert_eq!(spatial.min_lon, -37.0);
    assert_eq!(spatial.max_lon, -35.9);
    assert_eq!(spatial.min_lat, 10.0);
    assert_eq!(spatial.max_lat, 10.3);
    assert_eq!(spatial.active_months, 1);
}
