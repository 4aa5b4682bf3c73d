//! Rapport de validation post-chargement
//!
//! Structures typées pour les quatre analyses en lecture seule, avec
//! affichage console et export JSON.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

/// Un objet du schéma persisté (table, index ou trigger)
#[derive(Debug, Clone, Serialize)]
pub struct SchemaObject {
    pub kind: String,
    pub name: String,
    pub sql: Option<String>,
}

/// Statistiques de couverture d'un bassin
#[derive(Debug, Clone, Serialize)]
pub struct BasinCoverage {
    pub basin: String,
    pub storm_count: i64,
    pub first_year: i64,
    pub last_year: i64,
    pub active_years: i64,
    pub avg_observations_per_storm: f64,
}

/// Distribution d'intensité par catégorie (seuils 33/63/95 kt)
#[derive(Debug, Clone, Serialize)]
pub struct IntensityBucket {
    pub category: String,
    pub count: i64,
    pub min_pressure: Option<i64>,
    pub avg_pressure: Option<f64>,
    pub max_wind: i64,
    pub earliest_year: String,
    pub latest_year: String,
}

/// Couverture spatiale et temporelle globale des observations
#[derive(Debug, Clone, Serialize)]
pub struct SpatialCoverage {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
    pub total_observations: i64,
    pub active_months: i64,
    pub total_storms: i64,
}

/// Rapport complet de validation de la base
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub schema: Vec<SchemaObject>,
    pub basins: Vec<BasinCoverage>,
    pub intensity: Vec<IntensityBucket>,
    pub spatial: Option<SpatialCoverage>,
}

impl ValidationReport {
    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("DATABASE VALIDATION REPORT");
        println!("{}", "=".repeat(60));

        println!("\n--- SCHEMA ---");
        for object in &self.schema {
            println!("  {}: {}", object.kind, object.name);
        }

        println!("\n--- BASIN COVERAGE ---");
        for basin in &self.basins {
            println!(
                "  {}: {} storms over {} years ({}-{}), {:.1} observations/storm",
                basin.basin,
                basin.storm_count,
                basin.active_years,
                basin.first_year,
                basin.last_year,
                basin.avg_observations_per_storm
            );
        }

        println!("\n--- INTENSITY DISTRIBUTION ---");
        for bucket in &self.intensity {
            println!(
                "  {}: {} observations, max wind {} kt, period {}-{}",
                bucket.category, bucket.count, bucket.max_wind, bucket.earliest_year,
                bucket.latest_year
            );
            if let (Some(min_p), Some(avg_p)) = (bucket.min_pressure, bucket.avg_pressure) {
                println!("    Pressure range: {min_p}-{avg_p:.1} mb");
            }
        }

        if let Some(ref spatial) = self.spatial {
            println!("\n--- SPATIAL COVERAGE ---");
            println!(
                "  Bounds: {:.1}°{} to {:.1}°{}, {:.1}°{} to {:.1}°N",
                spatial.min_lon.abs(),
                if spatial.min_lon < 0.0 { "W" } else { "E" },
                spatial.max_lon.abs(),
                if spatial.max_lon < 0.0 { "W" } else { "E" },
                spatial.min_lat.abs(),
                if spatial.min_lat < 0.0 { "S" } else { "N" },
                spatial.max_lat
            );
            println!(
                "  Coverage: {} observations across {} storms, active in {} months of the year",
                spatial.total_observations, spatial.total_storms, spatial.active_months
            );
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Résumé compact sur une ligne
    pub fn summary(&self) -> String {
        let (observations, storms) = self
            .spatial
            .as_ref()
            .map(|s| (s.total_observations, s.total_storms))
            .unwrap_or((0, 0));
        format!(
            "{} schema objects, {} basins, {} observations across {} storms",
            self.schema.len(),
            self.basins.len(),
            observations,
            storms
        )
    }
}
