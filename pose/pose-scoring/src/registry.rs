//! Model registry keyed by exercise and phase.

use std::sync::Arc;

use hashbrown::HashMap;
use pose_angles::LayoutCatalog;
use pose_types::Phase;
use tracing::info;

use crate::config::ScoringConfig;
use crate::error::{Result, ScoringError};
use crate::knn::KnnModel;
use crate::library::ReferenceLibrary;
use crate::model::{ModelKey, ScoringModel};

/// Read-only set of scoring models, one per exercise and phase.
///
/// Built once at start-up and shared across threads; lookups never
/// mutate it.
///
/// # Example
///
/// ```
/// use pose_angles::LayoutCatalog;
/// use pose_scoring::{InMemoryLibrary, ModelRegistry, ScoringConfig};
/// use pose_types::{AngleVector, Phase, ReferenceExemplar};
///
/// let library: InMemoryLibrary = Phase::ALL
///     .into_iter()
///     .map(|phase| {
///         ReferenceExemplar::new("bicep_curl", phase, AngleVector::new(vec![90.0; 4]).unwrap(), 1.0)
///     })
///     .collect();
///
/// let registry =
///     ModelRegistry::build(&library, &LayoutCatalog::standard(), &ScoringConfig::default()).unwrap();
/// assert_eq!(registry.len(), 2);
/// assert!(registry.get("Bicep_Curl", Phase::SecondHalf).is_ok());
/// assert!(registry.get("plank", Phase::FirstHalf).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<ModelKey, Arc<dyn ScoringModel>>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a k-NN model for both phases of every exercise in `library`.
    ///
    /// Each model uses the exercise's layout from `catalog`.
    ///
    /// # Errors
    ///
    /// Fails on the first model that cannot be built, e.g.
    /// [`ScoringError::EmptyReferenceSet`] for an exercise with data for
    /// only one phase.
    pub fn build(
        library: &dyn ReferenceLibrary,
        catalog: &LayoutCatalog,
        config: &ScoringConfig,
    ) -> Result<Self> {
        config.validate()?;
        let params = config.knn_params();
        let mut registry = Self::new();

        for exercise in library.exercises() {
            let layout = catalog.resolve(&exercise);
            for phase in Phase::ALL {
                let model = KnnModel::build(
                    ModelKey::new(&exercise, phase),
                    layout.clone(),
                    library.exemplars(&exercise, phase).to_vec(),
                    params,
                )?;
                registry.insert(Arc::new(model));
            }
        }

        info!(
            models = registry.len(),
            k = params.k,
            tolerance_deg = params.tolerance_deg,
            "Built model registry"
        );

        Ok(registry)
    }

    /// Adds a model under its own key, replacing any previous one.
    pub fn insert(&mut self, model: Arc<dyn ScoringModel>) -> Option<Arc<dyn ScoringModel>> {
        self.models.insert(model.key().clone(), model)
    }

    /// Looks up the model for `exercise` (case-insensitive) and `phase`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::UnsupportedExerciseOrPhase`] if no model was
    /// built for the pair.
    pub fn get(&self, exercise: &str, phase: Phase) -> Result<&Arc<dyn ScoringModel>> {
        let key = ModelKey::new(exercise, phase);
        self.models
            .get(&key)
            .ok_or_else(|| ScoringError::unsupported(key.exercise(), phase))
    }

    /// Returns `true` if a model exists for `exercise` and `phase`.
    #[must_use]
    pub fn contains(&self, exercise: &str, phase: Phase) -> bool {
        self.models.contains_key(&ModelKey::new(exercise, phase))
    }

    /// Returns the registered keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&ModelKey> {
        let mut keys: Vec<_> = self.models.keys().collect();
        keys.sort();
        keys
    }

    /// Returns the number of models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if no models are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
