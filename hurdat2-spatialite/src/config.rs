//! Configuration du pipeline
//!
//! Tout l'état de configuration est porté par une struct explicite passée
//! aux constructeurs des composants: pas d'état global, chaque test peut
//! instancier sa propre configuration.

use std::path::PathBuf;
use std::time::Duration;

use hurdat2::EmptyNamePolicy;

/// Bassins acceptés par le schéma persisté
pub const ALLOWED_BASINS: [&str; 3] = ["AL", "EP", "CP"];

/// Boîte englobante géographique (degrés décimaux WGS84)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Boîte de l'Atlantique nord, réglée pour le bassin AL
    pub fn atlantic() -> Self {
        Self {
            west: -110.0,
            east: 15.0,
            south: 0.0,
            north: 75.0,
        }
    }

    /// Conversion vers le type `geo` pour le test de contenance
    pub fn to_rect(self) -> geo::Rect<f64> {
        geo::Rect::new(
            geo::coord! { x: self.west, y: self.south },
            geo::coord! { x: self.east, y: self.north },
        )
    }
}

/// Configuration complète d'une exécution du pipeline
#[derive(Debug, Clone)]
pub struct EtlConfig {
    /// Fichier source HURDAT2
    pub input_path: PathBuf,

    /// Base SpatiaLite cible (détruite et recréée à chaque exécution)
    pub db_path: PathBuf,

    /// Module SpatiaLite chargé dans chaque connexion
    /// (nom résolu par le loader système, ou chemin absolu)
    pub spatialite_module: String,

    /// Taille des lots d'insertion d'observations
    pub batch_size: usize,

    /// Boîte englobante de l'étape d'annotation
    pub bounds: BoundingBox,

    /// Politique pour les en-têtes sans nom
    pub empty_name_policy: EmptyNamePolicy,

    /// Tentatives d'initialisation du schéma avant erreur fatale
    pub schema_init_attempts: u32,

    /// Pause fixe entre deux tentatives d'initialisation
    pub schema_init_backoff: Duration,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("hurdat2.txt"),
            db_path: PathBuf::from("hurdat2.db"),
            spatialite_module: "mod_spatialite".into(),
            batch_size: 100,
            bounds: BoundingBox::atlantic(),
            empty_name_policy: EmptyNamePolicy::Unnamed,
            schema_init_attempts: 3,
            schema_init_backoff: Duration::from_millis(250),
        }
    }
}

impl EtlConfig {
    /// Charge la configuration depuis les variables d'environnement
    /// (les valeurs absentes gardent leur défaut)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("HURDAT2_DATA_FILE") {
            config.input_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("HURDAT2_DB") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(module) = std::env::var("SPATIALITE_LIBRARY_PATH") {
            config.spatialite_module = module;
        }
        if let Some(batch_size) = std::env::var("DB_BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.batch_size = batch_size;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Contains;

    #[test]
    fn test_atlantic_bounds_contain_gulf() {
        let rect = BoundingBox::atlantic().to_rect();
        assert!(rect.contains(&geo::point! { x: -90.2, y: 29.1 }));
        // Pacifique nord-ouest: dehors
        assert!(!rect.contains(&geo::point! { x: 140.0, y: 20.0 }));
    }

    #[test]
    fn test_default_config() {
        let config = EtlConfig::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.schema_init_attempts, 3);
    }
}
