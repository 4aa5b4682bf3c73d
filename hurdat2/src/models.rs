//! Modèles de données HURDAT2 (tempête et observation)

use chrono::NaiveDateTime;

use crate::point::Point;
use crate::types::{StormStatus, MISSING_VALUES};
use crate::Hurdat2Error;

/// Numéro de cyclone maximal dans un bassin pour une année
pub const MAX_CYCLONE_NUMBER: u8 = 99;

/// Bornes de plausibilité historique pour l'année d'un cyclone
pub const MIN_YEAR: u16 = 1800;
pub const MAX_YEAR: u16 = 2100;

/// Une observation best-track (cadence 6 h, entrées spéciales possibles)
///
/// Les champs numériques optionnels valent `None` quand la source contient
/// une sentinelle de valeur manquante (-999 ou -99).
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Horodatage UTC (date + heure de la ligne source)
    pub date: NaiveDateTime,
    /// Identifiant d'enregistrement (L = landfall, etc.), passé tel quel
    pub record_identifier: Option<char>,
    /// Statut du système
    pub status: StormStatus,
    /// Position du centre
    pub location: Point,
    /// Vent soutenu maximal (kt)
    pub max_wind: Option<i32>,
    /// Pression centrale minimale (mb)
    pub min_pressure: Option<i32>,
    /// Rayons de vent 34 kt par quadrant (NM)
    pub ne34: Option<i32>,
    pub se34: Option<i32>,
    pub sw34: Option<i32>,
    pub nw34: Option<i32>,
    /// Rayons de vent 50 kt par quadrant (NM)
    pub ne50: Option<i32>,
    pub se50: Option<i32>,
    pub sw50: Option<i32>,
    pub nw50: Option<i32>,
    /// Rayons de vent 64 kt par quadrant (NM)
    pub ne64: Option<i32>,
    pub se64: Option<i32>,
    pub sw64: Option<i32>,
    pub nw64: Option<i32>,
    /// Rayon du vent maximal (NM)
    pub max_wind_radius: Option<i32>,
}

impl Observation {
    /// Vérifie les invariants de domaine des champs numériques
    ///
    /// Les valeurs présentes doivent être non négatives: les sentinelles ont
    /// déjà été converties en `None` par le parsing.
    pub fn validate(&self) -> Result<(), Hurdat2Error> {
        let checks = [
            ("max_wind", self.max_wind),
            ("min_pressure", self.min_pressure),
            ("ne34", self.ne34),
            ("se34", self.se34),
            ("sw34", self.sw34),
            ("nw34", self.nw34),
            ("ne50", self.ne50),
            ("se50", self.se50),
            ("sw50", self.sw50),
            ("nw50", self.nw50),
            ("ne64", self.ne64),
            ("se64", self.se64),
            ("sw64", self.sw64),
            ("nw64", self.nw64),
            ("max_wind_radius", self.max_wind_radius),
        ];
        for (field, value) in checks {
            if let Some(v) = value {
                if v < 0 {
                    return Err(Hurdat2Error::Validation(format!(
                        "{field} must be non-negative, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Convertit un champ entier "possiblement manquant" du format source
///
/// Une sentinelle (-999, -99) devient `None`; toute autre valeur est
/// conservée telle quelle (les bornes de domaine sont vérifiées au niveau
/// modèle, pas ici).
pub fn parse_possible_missing(value: &str) -> Result<Option<i32>, Hurdat2Error> {
    let value = value.trim();
    let parsed: i32 = value.parse().map_err(|_| {
        Hurdat2Error::Validation(format!("expected integer field, got {value:?}"))
    })?;

    if MISSING_VALUES.contains(&parsed) {
        Ok(None)
    } else {
        Ok(Some(parsed))
    }
}

/// Un cyclone: en-tête + séquence ordonnée d'observations
///
/// L'ordre d'insertion des observations est l'ordre du fichier source, qui
/// est l'ordre chronologique.
#[derive(Debug, Clone, PartialEq)]
pub struct Storm {
    basin: String,
    cyclone_number: u8,
    year: u16,
    name: String,
    observations: Vec<Observation>,
}

impl Storm {
    /// Crée une tempête en validant ses invariants
    pub fn new(
        basin: impl Into<String>,
        cyclone_number: u8,
        year: u16,
        name: impl Into<String>,
        observations: Vec<Observation>,
    ) -> Result<Self, Hurdat2Error> {
        let basin = basin.into();
        let name = name.into();

        if basin.len() != 2 || !basin.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(Hurdat2Error::Validation(format!(
                "invalid basin code {basin:?}"
            )));
        }
        if cyclone_number > MAX_CYCLONE_NUMBER {
            return Err(Hurdat2Error::Validation(format!(
                "cyclone number must be 0-99, got {cyclone_number}"
            )));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Hurdat2Error::Validation(format!(
                "year must be {MIN_YEAR}-{MAX_YEAR}, got {year}"
            )));
        }
        if name.trim().is_empty() {
            return Err(Hurdat2Error::Validation("storm name is empty".into()));
        }

        Ok(Self {
            basin,
            cyclone_number,
            year,
            name,
            observations,
        })
    }

    pub fn basin(&self) -> &str {
        &self.basin
    }

    pub fn cyclone_number(&self) -> u8 {
        self.cyclone_number
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// Clé métier dérivée: bassin + numéro (zéro-paddé) + année
    pub fn storm_id(&self) -> String {
        format!("{}{:02}{}", self.basin, self.cyclone_number, self.year)
    }
}
