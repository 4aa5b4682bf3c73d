//! Taxonomie d'erreurs du pipeline ETL
//!
//! Les erreurs bas niveau du moteur (rusqlite) sont toujours capturées à la
//! frontière du composant et ré-émises comme l'une de ces variantes, avec la
//! cause d'origine conservée dans la chaîne.

use thiserror::Error;

use hurdat2::Hurdat2Error;

/// Erreurs fatales du pipeline Extract → Transform → Load
#[derive(Debug, Error)]
pub enum EtlError {
    /// Échec d'extraction (ligne malformée, fichier introuvable)
    #[error("extraction failed: {0}")]
    Extraction(#[from] Hurdat2Error),

    /// Échec inattendu pendant l'annotation d'une tempête
    #[error("transform failed for storm {storm}: {reason}")]
    Transform { storm: String, reason: String },

    /// Échec d'initialisation du schéma (après épuisement des tentatives)
    #[error("database initialization failed: {reason}")]
    DatabaseInit {
        reason: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// Échec d'insertion, avec l'identité de la tempête en cause
    #[error("insertion failed for storm {storm}: {reason}")]
    DatabaseInsert {
        storm: String,
        reason: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// Échec de la phase de validation/rapport (ne remet pas en cause le chargement)
    #[error("database validation failed: {reason}")]
    DatabaseValidation {
        reason: String,
        #[source]
        source: Option<rusqlite::Error>,
    },
}

impl EtlError {
    /// Erreur d'initialisation avec cause moteur
    pub fn init(reason: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::DatabaseInit {
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Erreur d'insertion avec identité de tempête et cause moteur
    pub fn insert(storm: impl Into<String>, reason: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::DatabaseInsert {
            storm: storm.into(),
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Erreur de validation avec cause moteur
    pub fn validation(reason: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::DatabaseValidation {
            reason: reason.into(),
            source: Some(source),
        }
    }
}
