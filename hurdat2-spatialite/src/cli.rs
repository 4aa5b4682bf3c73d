//! Définition et implémentation de la commande CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::config::EtlConfig;
use crate::extract::Extract;
use crate::load::{Load, LoadOutcome};
use crate::pipeline::{self, Progress};
use crate::transform::Transform;

/// Charger un fichier HURDAT2 dans une base SpatiaLite
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Fichier source HURDAT2 (défaut : env HURDAT2_DATA_FILE / hurdat2.txt)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Base SpatiaLite cible, détruite puis recréée (défaut : env HURDAT2_DB / hurdat2.db)
    #[arg(short, long)]
    pub db: Option<PathBuf>,

    /// Taille des lots d'insertion d'observations
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Module SpatiaLite à charger (défaut : env SPATIALITE_LIBRARY_PATH / mod_spatialite)
    #[arg(long)]
    pub spatialite: Option<String>,

    /// Désactiver l'affichage de progression
    #[arg(long)]
    pub no_progress: bool,

    /// Écrire le rapport de validation en JSON à ce chemin
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Applique les surcharges CLI sur la configuration d'environnement
fn build_config(args: &RunArgs) -> EtlConfig {
    let mut config = EtlConfig::from_env();
    if let Some(ref input) = args.input {
        config.input_path = input.clone();
    }
    if let Some(ref db) = args.db {
        config.db_path = db.clone();
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(ref module) = args.spatialite {
        config.spatialite_module = module.clone();
    }
    config
}

/// Exécute le pipeline complet
pub fn cmd_run(args: &RunArgs) -> Result<LoadOutcome> {
    let config = build_config(args);

    info!(
        input = %config.input_path.display(),
        db = %config.db_path.display(),
        batch_size = config.batch_size,
        "Starting HURDAT2 ETL pipeline"
    );

    let progress = if args.no_progress {
        Progress::disabled()
    } else {
        Progress::new(|update| {
            // Un jalon tous les 250 éléments, plus le dernier
            let at_end = update.total.is_some_and(|t| update.done == t);
            if update.done % 250 == 0 || at_end {
                match update.total {
                    Some(total) => println!("  [{}] {}/{}", update.stage, update.done, total),
                    None => println!("  [{}] {}", update.stage, update.done),
                }
            }
        })
    };

    let outcome = pipeline::run(
        Extract::new(config.clone()),
        Transform::new(config.bounds),
        Load::new(config.clone()),
        &progress,
    )
    .context("ETL pipeline failed")?;

    outcome.report.display();

    if let Some(ref path) = args.report {
        outcome
            .report
            .save_to_file(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "Validation report saved");
    }

    info!(
        storms = outcome.storms,
        observations = outcome.observations,
        "ETL pipeline completed successfully"
    );
    Ok(outcome)
}
