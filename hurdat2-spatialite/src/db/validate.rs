//! Validation post-chargement: quatre analyses indépendantes en lecture seule
//!
//! Aucune de ces requêtes ne modifie la base; un échec ici est signalé mais
//! ne remet pas en cause les données déjà persistées.

use rusqlite::Connection;
use tracing::info;

use crate::report::{
    BasinCoverage, IntensityBucket, SchemaObject, SpatialCoverage, ValidationReport,
};
use crate::EtlError;

/// Introspection du schéma: tables, index et triggers hors objets internes
const SCHEMA_QUERY: &str = "
    SELECT type, name, sql
    FROM sqlite_master
    WHERE type IN ('table', 'index', 'trigger')
    AND name NOT LIKE 'sqlite_%'
    ORDER BY type, name
";

const BASIN_COVERAGE_QUERY: &str = "
    SELECT basin,
           COUNT(*) AS storm_count,
           MIN(year) AS first_year,
           MAX(year) AS last_year,
           COUNT(DISTINCT year) AS active_years,
           AVG(
               (SELECT COUNT(*)
                FROM observations
                WHERE storm_id = storms.id)
           ) AS avg_observations_per_storm
    FROM storms
    GROUP BY basin
    ORDER BY storm_count DESC
";

/// Seuils d'intensité en kt: TD <= 33, TS <= 63, Cat1-2 <= 95, Cat3+ au-delà.
/// Les lignes à vent manquant (NULL ou sentinelle littérale) sont exclues.
fn intensity_query() -> String {
    let sentinels = hurdat2::MISSING_VALUES
        .map(|v| v.to_string())
        .join(", ");
    format!(
        "
    WITH intensity_categories AS (
        SELECT
            CASE
                WHEN max_wind <= 33 THEN 'TD'
                WHEN max_wind <= 63 THEN 'TS'
                WHEN max_wind <= 95 THEN 'Cat1-2'
                ELSE 'Cat3+'
            END AS category,
            min_pressure,
            max_wind,
            date
        FROM observations
        WHERE max_wind IS NOT NULL
          AND max_wind NOT IN ({sentinels})
    )
    SELECT
        category,
        COUNT(*) AS count,
        MIN(min_pressure) AS min_pressure,
        AVG(min_pressure) AS avg_pressure,
        MAX(max_wind) AS max_wind,
        strftime('%Y', MIN(date)) AS earliest_year,
        strftime('%Y', MAX(date)) AS latest_year
    FROM intensity_categories
    GROUP BY category
    ORDER BY count DESC
"
    )
}

/// Les longitudes au-delà de ±180° (artefact de certaines sources brutes)
/// sont renormalisées à la lecture, même règle que le parsing.
const SPATIAL_COVERAGE_QUERY: &str = "
    WITH raw_bounds AS (
        SELECT
            X(geom) AS lon,
            Y(geom) AS lat,
            strftime('%m', date) AS month
        FROM observations
    ),
    normalized_bounds AS (
        SELECT
            CASE
                WHEN lon > 180 THEN lon - 360
                WHEN lon <= -180 THEN lon + 360
                ELSE lon
            END AS norm_lon,
            lat,
            month
        FROM raw_bounds
    )
    SELECT
        MIN(norm_lon) AS min_lon,
        MAX(norm_lon) AS max_lon,
        MIN(lat) AS min_lat,
        MAX(lat) AS max_lat,
        COUNT(*) AS total_observations,
        COUNT(DISTINCT month) AS active_months,
        (
            SELECT COUNT(DISTINCT storm_id)
            FROM observations
        ) AS total_storms
    FROM normalized_bounds
";

/// Exécute les quatre analyses et assemble le rapport
pub fn validate_database(conn: &Connection) -> Result<ValidationReport, EtlError> {
    let report = ValidationReport {
        schema: schema_objects(conn)?,
        basins: basin_coverage(conn)?,
        intensity: intensity_distribution(conn)?,
        spatial: spatial_coverage(conn)?,
    };
    info!(summary = %report.summary(), "Database validation complete");
    Ok(report)
}

/// Énumère tables, index et triggers
pub fn schema_objects(conn: &Connection) -> Result<Vec<SchemaObject>, EtlError> {
    let mut stmt = conn
        .prepare(SCHEMA_QUERY)
        .map_err(|e| EtlError::validation("failed to prepare schema query", e))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(SchemaObject {
                kind: row.get(0)?,
                name: row.get(1)?,
                sql: row.get(2)?,
            })
        })
        .map_err(|e| EtlError::validation("schema introspection failed", e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| EtlError::validation("schema introspection failed", e))?;

    Ok(rows)
}

/// Couverture par bassin: volume, étendue temporelle, observations moyennes
pub fn basin_coverage(conn: &Connection) -> Result<Vec<BasinCoverage>, EtlError> {
    let mut stmt = conn
        .prepare(BASIN_COVERAGE_QUERY)
        .map_err(|e| EtlError::validation("failed to prepare basin coverage query", e))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(BasinCoverage {
                basin: row.get(0)?,
                storm_count: row.get(1)?,
                first_year: row.get(2)?,
                last_year: row.get(3)?,
                active_years: row.get(4)?,
                avg_observations_per_storm: row.get(5)?,
            })
        })
        .map_err(|e| EtlError::validation("basin coverage analysis failed", e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| EtlError::validation("basin coverage analysis failed", e))?;

    Ok(rows)
}

/// Distribution des observations par catégorie d'intensité
pub fn intensity_distribution(conn: &Connection) -> Result<Vec<IntensityBucket>, EtlError> {
    let mut stmt = conn
        .prepare(&intensity_query())
        .map_err(|e| EtlError::validation("failed to prepare intensity query", e))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(IntensityBucket {
                category: row.get(0)?,
                count: row.get(1)?,
                min_pressure: row.get(2)?,
                avg_pressure: row.get(3)?,
                max_wind: row.get(4)?,
                earliest_year: row.get(5)?,
                latest_year: row.get(6)?,
            })
        })
        .map_err(|e| EtlError::validation("intensity distribution analysis failed", e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| EtlError::validation("intensity distribution analysis failed", e))?;

    Ok(rows)
}

/// Bornes spatiales normalisées et volumétrie globale
///
/// `None` quand la base ne contient aucune observation (les agrégats MIN/MAX
/// sont alors NULL).
pub fn spatial_coverage(conn: &Connection) -> Result<Option<SpatialCoverage>, EtlError> {
    let result = conn.query_row(SPATIAL_COVERAGE_QUERY, [], |row| {
        let min_lon: Option<f64> = row.get(0)?;
        let Some(min_lon) = min_lon else {
            return Ok(None);
        };
        Ok(Some(SpatialCoverage {
            min_lon,
            max_lon: row.get(1)?,
            min_lat: row.get(2)?,
            max_lat: row.get(3)?,
            total_observations: row.get(4)?,
            active_months: row.get(5)?,
            total_storms: row.get(6)?,
        }))
    });

    result.map_err(|e| EtlError::validation("spatial coverage analysis failed", e))
}
