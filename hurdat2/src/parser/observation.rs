//! Parser des lignes d'observation
//!
//! Format: 21 champs séparés par des virgules:
//! date, heure, identifiant d'enregistrement, statut, lat, lon, vent max,
//! pression, 12 rayons de vent (NE/SE/SW/NW à 34/50/64 kt), rayon du vent max.
//!
//! Exemple:
//! `20210829, 1655, L, HU, 29.1N,  90.2W, 130,  931,  130,  110, ...`

use chrono::NaiveDateTime;

use crate::models::{parse_possible_missing, Observation};
use crate::point::Point;
use crate::types::StormStatus;
use crate::Hurdat2Error;

/// Nombre de champs d'une ligne d'observation
const OBSERVATION_FIELD_COUNT: usize = 21;

/// Parse une ligne d'observation HURDAT2
///
/// Moins de 21 champs est une erreur dure: un parse partiel décalerait
/// l'affectation des rayons de vent aux quadrants.
pub fn parse_observation(line: &str) -> Result<Observation, Hurdat2Error> {
    if line.trim().is_empty() {
        return Err(Hurdat2Error::Validation("empty observation line".into()));
    }

    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    if fields.len() < OBSERVATION_FIELD_COUNT {
        return Err(Hurdat2Error::Validation(format!(
            "expected {OBSERVATION_FIELD_COUNT} observation fields, got {}",
            fields.len()
        )));
    }

    let date = parse_timestamp(fields[0], fields[1])?;
    let record_identifier = parse_record_identifier(fields[2])?;
    let status: StormStatus = fields[3].parse()?;
    let location = Point::from_hurdat2(fields[4], fields[5])?;

    let observation = Observation {
        date,
        record_identifier,
        status,
        location,
        max_wind: parse_possible_missing(fields[6])?,
        min_pressure: parse_possible_missing(fields[7])?,
        ne34: parse_possible_missing(fields[8])?,
        se34: parse_possible_missing(fields[9])?,
        sw34: parse_possible_missing(fields[10])?,
        nw34: parse_possible_missing(fields[11])?,
        ne50: parse_possible_missing(fields[12])?,
        se50: parse_possible_missing(fields[13])?,
        sw50: parse_possible_missing(fields[14])?,
        nw50: parse_possible_missing(fields[15])?,
        ne64: parse_possible_missing(fields[16])?,
        se64: parse_possible_missing(fields[17])?,
        sw64: parse_possible_missing(fields[18])?,
        nw64: parse_possible_missing(fields[19])?,
        max_wind_radius: parse_possible_missing(fields[20])?,
    };

    observation.validate()?;
    Ok(observation)
}

/// Combine les champs date (`YYYYMMDD`) et heure (`HHMM`) en horodatage
fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, Hurdat2Error> {
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y%m%d %H%M").map_err(|e| {
        Hurdat2Error::Validation(format!("invalid timestamp {date:?} {time:?}: {e}"))
    })
}

/// Identifiant d'enregistrement: vide = absent, sinon code d'une lettre
/// passé tel quel (pas de vocabulaire imposé)
fn parse_record_identifier(field: &str) -> Result<Option<char>, Hurdat2Error> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(c), None) => Ok(Some(c)),
        _ => Err(Hurdat2Error::Validation(format!(
            "record identifier must be a single letter, got {field:?}"
        ))),
    }
}
