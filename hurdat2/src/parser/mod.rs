//! Parsers de lignes HURDAT2
//!
//! Deux sortes d'enregistrements, une ligne chacun:
//! - en-tête de tempête (id cyclone, nom, nombre d'observations à suivre)
//! - observation (21 champs séparés par des virgules)

pub mod header;
pub mod observation;

pub use header::{parse_header, Header};
pub use observation::parse_observation;
