//! Types d'erreurs pour le crate hurdat2

use thiserror::Error;

/// Erreurs pouvant survenir lors du parsing HURDAT2
#[derive(Debug, Error)]
pub enum Hurdat2Error {
    /// Erreur d'I/O lors de la lecture du fichier source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fichier source introuvable
    #[error("HURDAT2 file not found: {0}")]
    FileNotFound(String),

    /// Coordonnée invalide (lettre cardinale absente ou magnitude illisible)
    #[error("Invalid coordinate {value:?}: {reason}")]
    Coordinate { value: String, reason: String },

    /// Erreur de parsing d'une ligne, avec son numéro (base 1) et son texte brut
    #[error("Parse error at line {line}: {reason}\n  {raw}")]
    Parse {
        line: usize,
        raw: String,
        reason: String,
    },

    /// Violation d'un invariant du modèle (plage, champ vide, code inconnu)
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl Hurdat2Error {
    /// Crée une erreur de coordonnée avec contexte
    pub fn coordinate(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Coordinate {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Attache un numéro de ligne et le texte brut à une erreur de bas niveau
    pub fn at_line(self, line: usize, raw: &str) -> Self {
        match self {
            // Déjà localisée, on ne ré-emballe pas
            Self::Parse { .. } => self,
            other => Self::Parse {
                line,
                raw: raw.trim_end().to_string(),
                reason: other.to_string(),
            },
        }
    }
}
