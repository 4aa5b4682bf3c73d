//! Contrat des étapes du pipeline Extract → Transform → Load
//!
//! Chaque étape est une capacité `process(input) -> output`; la progression
//! est un observateur injecté, pas un comportement hérité. Un observateur
//! désactivé est un no-op et ne change rien au comportement des étapes.

use crate::EtlError;

/// Événement de progression émis par une étape
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate<'a> {
    /// Nom de l'étape émettrice
    pub stage: &'a str,
    /// Unités traitées depuis le début de l'étape
    pub done: u64,
    /// Total attendu, si connu
    pub total: Option<u64>,
}

/// Observateur de progression optionnel (canal latéral, jamais de contrôle)
pub struct Progress {
    callback: Option<Box<dyn Fn(ProgressUpdate<'_>)>>,
}

impl Progress {
    /// Observateur actif
    pub fn new(callback: impl Fn(ProgressUpdate<'_>) + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// Observateur désactivé
    pub fn disabled() -> Self {
        Self { callback: None }
    }

    /// Émet un événement (ignoré si désactivé)
    pub fn update(&self, stage: &str, done: u64, total: Option<u64>) {
        if let Some(ref callback) = self.callback {
            callback(ProgressUpdate { stage, done, total });
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Une étape du pipeline
pub trait Stage {
    type Input;
    type Output;

    /// Nom affiché dans les logs et la progression
    fn name(&self) -> &'static str;

    /// Consomme l'entrée et produit la sortie de l'étape
    fn process(&mut self, input: Self::Input, progress: &Progress)
        -> Result<Self::Output, EtlError>;
}

/// Enchaîne les trois étapes séquentiellement (mono-thread, synchrone)
pub fn run<E, T, L>(
    mut extract: E,
    mut transform: T,
    mut load: L,
    progress: &Progress,
) -> Result<L::Output, EtlError>
where
    E: Stage<Input = ()>,
    T: Stage<Input = E::Output>,
    L: Stage<Input = T::Output>,
{
    let extracted = extract.process((), progress)?;
    let transformed = transform.process(extracted, progress)?;
    load.process(transformed, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Double;

    impl Stage for Double {
        type Input = u64;
        type Output = u64;

        fn name(&self) -> &'static str {
            "double"
        }

        fn process(&mut self, input: u64, progress: &Progress) -> Result<u64, EtlError> {
            progress.update(self.name(), 1, Some(1));
            Ok(input * 2)
        }
    }

    struct Seed(u64);

    impl Stage for Seed {
        type Input = ();
        type Output = u64;

        fn name(&self) -> &'static str {
            "seed"
        }

        fn process(&mut self, _: (), _: &Progress) -> Result<u64, EtlError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_run_chains_stages() {
        let result = run(Seed(3), Double, Double, &Progress::disabled()).unwrap();
        assert_eq!(result, 12);
    }

    #[test]
    fn test_progress_observer_receives_updates() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let progress = Progress::new(move |u| sink.borrow_mut().push((u.stage.to_string(), u.done)));

        run(Seed(1), Double, Double, &progress).unwrap();
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[0].0, "double");
    }

    #[test]
    fn test_disabled_progress_is_noop() {
        // Même résultat, observateur ou non
        assert_eq!(
            run(Seed(5), Double, Double, &Progress::disabled()).unwrap(),
            run(Seed(5), Double, Double, &Progress::new(|_| {})).unwrap()
        );
    }
}
