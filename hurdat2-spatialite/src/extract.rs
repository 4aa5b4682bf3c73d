//! Étape Extract: fichier HURDAT2 → tempêtes typées
//!
//! L'itérateur du crate `hurdat2` est paresseux; cette étape le matérialise
//! car l'écrivain a besoin d'un total connu pour la comptabilité des lots et
//! de la progression.

use tracing::info;

use hurdat2::{read_storms, Storm};

use crate::config::EtlConfig;
use crate::pipeline::{Progress, Stage};
use crate::EtlError;

/// Étape d'extraction
pub struct Extract {
    config: EtlConfig,
}

impl Extract {
    pub fn new(config: EtlConfig) -> Self {
        Self { config }
    }
}

impl Stage for Extract {
    type Input = ();
    type Output = Vec<Storm>;

    fn name(&self) -> &'static str {
        "extract"
    }

    fn process(&mut self, _: (), progress: &Progress) -> Result<Vec<Storm>, EtlError> {
        info!(input = %self.config.input_path.display(), "Starting extraction");

        let reader = read_storms(&self.config.input_path, self.config.empty_name_policy)?;

        let mut storms = Vec::new();
        for storm in reader {
            storms.push(storm?);
            progress.update(self.name(), storms.len() as u64, None);
        }

        info!(storms = storms.len(), "Extraction complete");
        Ok(storms)
    }
}
