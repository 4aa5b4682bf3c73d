//! Étape Transform: annotation par boîte englobante
//!
//! Passe sans état sur les observations: celles qui tombent hors de la boîte
//! configurée sont signalées dans les logs, rien n'est modifié, filtré ni
//! rejeté. La sortie est structurellement identique à l'entrée.

use geo::Contains;
use tracing::{debug, info};

use hurdat2::Storm;

use crate::config::BoundingBox;
use crate::pipeline::{Progress, Stage};
use crate::EtlError;

/// Étape d'annotation géographique
pub struct Transform {
    rect: geo::Rect<f64>,
    bounds: BoundingBox,
}

impl Transform {
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            rect: bounds.to_rect(),
            bounds,
        }
    }

    /// Compte les observations d'une tempête hors de la boîte, en les loguant
    fn annotate(&self, storm: &Storm) -> usize {
        let mut outside = 0;
        for (index, observation) in storm.observations().iter().enumerate() {
            let point: geo::Point<f64> = observation.location.into();
            if !self.rect.contains(&point) {
                outside += 1;
                info!(
                    storm_id = %storm.storm_id(),
                    index,
                    lon = point.x(),
                    lat = point.y(),
                    "Observation outside expected region"
                );
            }
        }
        outside
    }
}

impl Stage for Transform {
    type Input = Vec<Storm>;
    type Output = Vec<Storm>;

    fn name(&self) -> &'static str {
        "transform"
    }

    fn process(&mut self, storms: Vec<Storm>, progress: &Progress) -> Result<Vec<Storm>, EtlError> {
        info!(
            west = self.bounds.west,
            east = self.bounds.east,
            south = self.bounds.south,
            north = self.bounds.north,
            "Annotating storms against bounding box"
        );

        let total = storms.len() as u64;
        let mut outside_total = 0usize;

        for (done, storm) in storms.iter().enumerate() {
            let outside = self.annotate(storm);
            if outside > 0 {
                debug!(
                    storm_id = %storm.storm_id(),
                    outside,
                    "Storm has out-of-region observations"
                );
            }
            outside_total += outside;
            progress.update(self.name(), done as u64 + 1, Some(total));
        }

        info!(
            storms = storms.len(),
            outside_observations = outside_total,
            "Transform complete"
        );
        Ok(storms)
    }
}
