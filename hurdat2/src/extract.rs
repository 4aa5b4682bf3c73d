//! Extraction en flux: fichier HURDAT2 → séquence de tempêtes
//!
//! Machine à deux états: en attente d'en-tête, puis consommation d'exactement
//! `observation_count` lignes d'observations avant l'en-tête suivant.
//! Le compte déclaré par l'en-tête délimite les tempêtes: une ligne invalide
//! désynchroniserait toutes les frontières suivantes, donc toute erreur est
//! fatale pour l'extraction entière (pas de reprise, pas de saut de ligne).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::models::Storm;
use crate::parser::{parse_header, parse_observation};
use crate::Hurdat2Error;

/// Nom substitué aux en-têtes sans nom quand la politique est `Unnamed`
pub const UNNAMED: &str = "UNNAMED";

/// Politique de traitement d'un nom de tempête vide dans l'en-tête
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyNamePolicy {
    /// Substituer "UNNAMED" (convention des données historiques NHC)
    #[default]
    Unnamed,
    /// Rejeter l'en-tête comme invalide
    Reject,
}

/// Itérateur paresseux de tempêtes complètes sur une source ligne par ligne
///
/// Séquence finie, mono-passe, non redémarrable: re-parser exige de rouvrir
/// la source. La première erreur termine l'itération.
pub struct StormReader<R> {
    reader: R,
    buf: String,
    line_number: usize,
    policy: EmptyNamePolicy,
    failed: bool,
}

impl<R: BufRead> StormReader<R> {
    pub fn new(reader: R, policy: EmptyNamePolicy) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_number: 0,
            policy,
            failed: false,
        }
    }

    /// Lit la ligne suivante; `None` en fin de fichier
    fn read_line(&mut self) -> Result<Option<&str>, Hurdat2Error> {
        self.buf.clear();
        let bytes = self.reader.read_line(&mut self.buf)?;
        if bytes == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        Ok(Some(self.buf.as_str()))
    }

    /// Consomme un bloc complet en-tête + observations
    fn read_storm(&mut self) -> Result<Option<Storm>, Hurdat2Error> {
        let header_raw = match self.read_line()? {
            Some(raw) => raw.to_string(),
            None => return Ok(None),
        };
        let header_line = self.line_number;

        let header =
            parse_header(&header_raw).map_err(|e| e.at_line(header_line, &header_raw))?;

        let name = if header.name.is_empty() {
            match self.policy {
                EmptyNamePolicy::Unnamed => UNNAMED.to_string(),
                EmptyNamePolicy::Reject => {
                    return Err(Hurdat2Error::Validation("empty storm name".into())
                        .at_line(header_line, &header_raw));
                }
            }
        } else {
            header.name.clone()
        };

        let mut observations = Vec::with_capacity(header.observation_count);
        for i in 0..header.observation_count {
            let line_number = self.line_number + 1;
            let raw = match self.read_line()? {
                Some(raw) => raw.to_string(),
                None => {
                    return Err(Hurdat2Error::Parse {
                        line: line_number,
                        raw: String::new(),
                        reason: format!(
                            "unexpected end of file: header declared {} observations, got {i}",
                            header.observation_count
                        ),
                    });
                }
            };
            let observation =
                parse_observation(&raw).map_err(|e| e.at_line(line_number, &raw))?;
            observations.push(observation);
        }

        let storm = Storm::new(
            header.basin,
            header.cyclone_number,
            header.year,
            name,
            observations,
        )
        .map_err(|e| e.at_line(header_line, &header_raw))?;

        debug!(
            storm_id = %storm.storm_id(),
            observations = storm.observation_count(),
            "Extracted storm"
        );
        Ok(Some(storm))
    }
}

impl<R: BufRead> Iterator for StormReader<R> {
    type Item = Result<Storm, Hurdat2Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_storm() {
            Ok(Some(storm)) => Some(Ok(storm)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Ouvre un fichier HURDAT2 et retourne l'itérateur de tempêtes
///
/// # Errors
///
/// `Hurdat2Error::FileNotFound` si le chemin n'existe pas ou n'est pas un
/// fichier régulier.
pub fn read_storms(
    path: &Path,
    policy: EmptyNamePolicy,
) -> Result<StormReader<BufReader<File>>, Hurdat2Error> {
    if !path.is_file() {
        return Err(Hurdat2Error::FileNotFound(path.display().to_string()));
    }
    let file = File::open(path)?;
    Ok(StormReader::new(BufReader::new(file), policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(data: &str) -> StormReader<Cursor<&str>> {
        StormReader::new(Cursor::new(data), EmptyNamePolicy::default())
    }

    const ONE_STORM: &str = "\
AL122007,              KAREN,      2,
20070925, 0000,  , TD, 10.0N,  35.9W,  30, 1006,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0,    0, -999
20070925, 0600,  , TS, 10.3N,  37.0W,  35, 1005,   40,   30,    0,   40,    0,    0,    0,    0,    0,    0,    0,    0, -999
";

    #[test]
    fn test_single_storm_in_order() {
        let storms: Vec<_> = reader(ONE_STORM).collect::<Result<_, _>>().unwrap();
        assert_eq!(storms.len(), 1);
        assert_eq!(storms[0].storm_id(), "AL122007");
        assert_eq!(storms[0].name(), "KAREN");
        assert_eq!(storms[0].observation_count(), 2);
        assert!(storms[0].observations()[0].date < storms[0].observations()[1].date);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(reader("").count(), 0);
    }

    #[test]
    fn test_truncated_block_is_fatal() {
        // 2 observations déclarées, une seule présente
        let data = ONE_STORM.lines().take(2).collect::<Vec<_>>().join("\n");
        let mut r = reader(&data);
        let err = r.next().unwrap().unwrap_err();
        match err {
            Hurdat2Error::Parse { line, ref reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("declared 2 observations"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
        // L'itérateur est épuisé après l'erreur
        assert!(r.next().is_none());
    }

    #[test]
    fn test_bad_observation_line_number() {
        let data = ONE_STORM.replace("TS", "ZZ");
        let err = reader(&data).next().unwrap().unwrap_err();
        match err {
            Hurdat2Error::Parse { line, ref raw, .. } => {
                assert_eq!(line, 3);
                assert!(raw.contains("ZZ"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_header_is_fatal() {
        let data = "not a header\n";
        assert!(reader(data).next().unwrap().is_err());
    }

    #[test]
    fn test_unnamed_policy_substitutes() {
        let data = ONE_STORM.replace("              KAREN", "                   ");
        let storms: Vec<_> = reader(&data).collect::<Result<_, _>>().unwrap();
        assert_eq!(storms[0].name(), UNNAMED);
    }

    #[test]
    fn test_reject_policy_fails_on_empty_name() {
        let data = ONE_STORM.replace("              KAREN", "                   ");
        let mut r = StormReader::new(Cursor::new(data.as_str()), EmptyNamePolicy::Reject);
        assert!(r.next().unwrap().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = read_storms(Path::new("/nonexistent/hurdat2.txt"), Default::default())
            .err()
            .unwrap();
        assert!(matches!(err, Hurdat2Error::FileNotFound(_)));
    }

    #[test]
    fn test_two_storms_boundary() {
        let data = format!("{ONE_STORM}{}", ONE_STORM.replace("AL122007", "AL132007"));
        let storms: Vec<_> = reader(&data).collect::<Result<_, _>>().unwrap();
        assert_eq!(storms.len(), 2);
        assert_eq!(storms[1].storm_id(), "AL132007");
    }
}
