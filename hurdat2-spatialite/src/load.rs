//! Étape Load: schéma, insertion transactionnelle, validation et rapport

use tracing::info;

use hurdat2::Storm;

use crate::config::EtlConfig;
use crate::db::{connection, insert, schema, validate};
use crate::pipeline::{Progress, Stage};
use crate::report::ValidationReport;
use crate::EtlError;

/// Résultat complet du chargement
#[derive(Debug)]
pub struct LoadOutcome {
    pub storms: usize,
    pub observations: usize,
    pub report: ValidationReport,
}

/// Étape de chargement
pub struct Load {
    config: EtlConfig,
}

impl Load {
    pub fn new(config: EtlConfig) -> Self {
        Self { config }
    }
}

impl Stage for Load {
    type Input = Vec<Storm>;
    type Output = LoadOutcome;

    fn name(&self) -> &'static str {
        "load"
    }

    fn process(&mut self, storms: Vec<Storm>, progress: &Progress) -> Result<LoadOutcome, EtlError> {
        info!(
            db = %self.config.db_path.display(),
            storms = storms.len(),
            batch_size = self.config.batch_size,
            "Starting load"
        );

        schema::initialize(&self.config)?;

        let mut conn = connection::open(&self.config.db_path, &self.config.spatialite_module)
            .map_err(|e| EtlError::init("failed to open connection for insertion", e))?;

        let summary = insert::insert_storms(&mut conn, &storms, &self.config, progress)?;

        // La validation court après le commit: son échec ne défait pas le
        // chargement déjà persisté
        let report = validate::validate_database(&conn)?;

        Ok(LoadOutcome {
            storms: summary.storms,
            observations: summary.observations,
            report,
        })
    }
}
