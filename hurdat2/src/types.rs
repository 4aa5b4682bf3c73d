//! Types de données pour le crate hurdat2

use std::fmt;
use std::str::FromStr;

use crate::Hurdat2Error;

/// Valeurs sentinelles "donnée manquante" du format source
pub const MISSING_VALUES: [i32; 2] = [-999, -99];

/// Statut d'un système cyclonique (vocabulaire fermé du format HURDAT2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StormStatus {
    /// TD - dépression tropicale (< 34 kt)
    TropicalDepression,
    /// TS - tempête tropicale (34-63 kt)
    TropicalStorm,
    /// HU - ouragan (>= 64 kt)
    Hurricane,
    /// EX - cyclone extratropical
    Extratropical,
    /// SD - dépression subtropicale
    SubtropicalDepression,
    /// SS - tempête subtropicale
    SubtropicalStorm,
    /// LO - dépression résiduelle (ni tropicale, ni subtropicale, ni extratropicale)
    Low,
    /// WV - onde tropicale
    TropicalWave,
    /// DB - perturbation
    Disturbance,
}

impl StormStatus {
    /// Tous les codes du vocabulaire, dans l'ordre du format
    pub const ALL: [StormStatus; 9] = [
        StormStatus::TropicalDepression,
        StormStatus::TropicalStorm,
        StormStatus::Hurricane,
        StormStatus::Extratropical,
        StormStatus::SubtropicalDepression,
        StormStatus::SubtropicalStorm,
        StormStatus::Low,
        StormStatus::TropicalWave,
        StormStatus::Disturbance,
    ];

    /// Code à deux lettres tel qu'il apparaît dans le fichier source
    pub fn as_str(&self) -> &'static str {
        match self {
            StormStatus::TropicalDepression => "TD",
            StormStatus::TropicalStorm => "TS",
            StormStatus::Hurricane => "HU",
            StormStatus::Extratropical => "EX",
            StormStatus::SubtropicalDepression => "SD",
            StormStatus::SubtropicalStorm => "SS",
            StormStatus::Low => "LO",
            StormStatus::TropicalWave => "WV",
            StormStatus::Disturbance => "DB",
        }
    }
}

impl FromStr for StormStatus {
    type Err = Hurdat2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TD" => Ok(StormStatus::TropicalDepression),
            "TS" => Ok(StormStatus::TropicalStorm),
            "HU" => Ok(StormStatus::Hurricane),
            "EX" => Ok(StormStatus::Extratropical),
            "SD" => Ok(StormStatus::SubtropicalDepression),
            "SS" => Ok(StormStatus::SubtropicalStorm),
            "LO" => Ok(StormStatus::Low),
            "WV" => Ok(StormStatus::TropicalWave),
            "DB" => Ok(StormStatus::Disturbance),
            other => Err(Hurdat2Error::Validation(format!(
                "unknown storm status {other:?}, expected one of TD/TS/HU/EX/SD/SS/LO/WV/DB"
            ))),
        }
    }
}

impl fmt::Display for StormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
