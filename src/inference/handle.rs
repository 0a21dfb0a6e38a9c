//! Model Handle - loaded classifier plus its resolved column order

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Classifier, InferenceError, OnnxClassifier};
use crate::features::layout::{fallback_feature_names, unmapped_columns, LayoutInfo};

/// Sidecar metadata published next to the model artifact
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub model_type: Option<String>,
    /// Column order the model was fit with
    #[serde(default)]
    pub feature_names: Vec<String>,
    /// Derived layout hash recorded when the model was exported
    #[serde(default)]
    pub layout_hash: Option<String>,
}

impl ModelMetadata {
    /// Read the sidecar. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>, ModelLoadError> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|e| ModelLoadError::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let metadata = serde_json::from_str(&raw).map_err(|e| ModelLoadError::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Some(metadata))
    }

    /// The published layout hash, if present and different from the
    /// deriver's current layout
    pub fn layout_mismatch(&self) -> Option<&str> {
        let published = self.layout_hash.as_deref()?;
        if LayoutInfo::current().matches(published) {
            None
        } else {
            Some(published)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("Model not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid model metadata {path}: {reason}")]
    Metadata { path: PathBuf, reason: String },

    #[error("Model accepts {declared} feature columns but {resolved} feature names were resolved")]
    ColumnMismatch { declared: usize, resolved: usize },

    #[error(transparent)]
    Runtime(#[from] InferenceError),
}

/// Immutable, process-wide model state.
///
/// Built once at startup and shared behind `Arc`; never mutated afterwards.
pub struct ModelHandle {
    classifier: Arc<dyn Classifier>,
    feature_names: Vec<String>,
}

impl ModelHandle {
    /// Build a handle, rejecting a column list the classifier cannot accept
    pub fn try_new(
        classifier: Arc<dyn Classifier>,
        feature_names: Vec<String>,
    ) -> Result<Self, ModelLoadError> {
        if let Some(declared) = classifier.input_width() {
            if declared != feature_names.len() {
                return Err(ModelLoadError::ColumnMismatch {
                    declared,
                    resolved: feature_names.len(),
                });
            }
        }

        Ok(Self::new(classifier, feature_names))
    }

    /// Build a handle without checking the classifier's declared width
    pub fn new(classifier: Arc<dyn Classifier>, feature_names: Vec<String>) -> Self {
        let unmapped = unmapped_columns(&feature_names);
        if !unmapped.is_empty() {
            warn!(
                columns = ?unmapped,
                "Model expects columns the deriver does not produce; they will be zero-filled"
            );
        }

        Self {
            classifier,
            feature_names,
        }
    }

    /// Load the ONNX artifact and resolve its column order.
    ///
    /// Column order comes from the sidecar's `feature_names` when present,
    /// otherwise the fallback full-schema list.
    pub fn load(
        model_path: &Path,
        metadata_path: &Path,
        intra_threads: usize,
    ) -> Result<Self, ModelLoadError> {
        if !model_path.exists() {
            return Err(ModelLoadError::NotFound(model_path.to_path_buf()));
        }

        let metadata = ModelMetadata::load(metadata_path)?.unwrap_or_default();

        let layout = LayoutInfo::current();
        if let Some(published) = metadata.layout_mismatch() {
            warn!(
                published,
                current = %layout.hash_hex(),
                "Model was exported against a different feature layout"
            );
        }

        let feature_names = if metadata.feature_names.is_empty() {
            info!("Artifact publishes no feature names; using fallback column order");
            fallback_feature_names()
        } else {
            metadata.feature_names
        };

        let model_type = metadata
            .model_type
            .unwrap_or_else(|| "OnnxClassifier".to_string());

        let classifier = OnnxClassifier::load(model_path, intra_threads, model_type)?;
        let handle = Self::try_new(Arc::new(classifier), feature_names)?;

        info!(
            feature_count = handle.feature_count(),
            features = ?handle.feature_names(),
            layout_version = layout.version,
            layout_hash = %layout.hash_hex(),
            "Model handle ready"
        );

        Ok(handle)
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    pub fn model_type(&self) -> &str {
        self.classifier.model_type()
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model_type", &self.model_type())
            .field("feature_names", &self.feature_names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio_test::assert_ok;

    use crate::features::{FeatureVector, DERIVED_FEATURES};
    use crate::inference::Classification;

    /// Fixed-width classifier that always answers "not fraud"
    struct Fixed(Option<usize>);

    impl Classifier for Fixed {
        fn classify(&self, _: &FeatureVector) -> Result<Classification, InferenceError> {
            Ok(Classification {
                predicted_class: 0,
                fraud_probability: 0.0,
            })
        }

        fn model_type(&self) -> &str {
            "Fixed"
        }

        fn input_width(&self) -> Option<usize> {
            self.0
        }
    }

    fn derived_names() -> Vec<String> {
        DERIVED_FEATURES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fallback_columns_rejected_by_narrow_model() {
        // Model fit on the eleven derived columns, no sidecar to say so
        let err = ModelHandle::try_new(Arc::new(Fixed(Some(11))), fallback_feature_names())
            .unwrap_err();
        match err {
            ModelLoadError::ColumnMismatch { declared, resolved } => {
                assert_eq!(declared, 11);
                assert_eq!(resolved, 17);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_matching_or_dynamic_width_accepted() {
        let handle = assert_ok!(ModelHandle::try_new(
            Arc::new(Fixed(Some(11))),
            derived_names()
        ));
        assert_eq!(handle.feature_count(), 11);

        let handle = assert_ok!(ModelHandle::try_new(
            Arc::new(Fixed(None)),
            fallback_feature_names()
        ));
        assert_eq!(handle.feature_count(), 17);
    }

    #[test]
    fn test_layout_hash_in_sidecar() {
        let current = LayoutInfo::current().hash_hex();

        let matching = ModelMetadata {
            layout_hash: Some(current),
            ..Default::default()
        };
        assert_eq!(matching.layout_mismatch(), None);

        let stale = ModelMetadata {
            layout_hash: Some("deadbeef".to_string()),
            ..Default::default()
        };
        if LayoutInfo::current().hash != 0xdeadbeef {
            assert_eq!(stale.layout_mismatch(), Some("deadbeef"));
        }

        assert_eq!(ModelMetadata::default().layout_mismatch(), None);
    }

    #[test]
    fn test_metadata_missing_file() {
        let result = assert_ok!(ModelMetadata::load(Path::new("no/such/metadata.json")));
        assert!(result.is_none());
    }

    #[test]
    fn test_metadata_parses_sidecar() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"model_type": "RandomForestClassifier", "feature_names": ["Risk_Score", "Hour"]}}"#
        )
        .unwrap();

        let metadata = assert_ok!(ModelMetadata::load(file.path())).unwrap();
        assert_eq!(metadata.model_type.as_deref(), Some("RandomForestClassifier"));
        assert_eq!(metadata.feature_names, vec!["Risk_Score", "Hour"]);
        assert!(metadata.layout_hash.is_none());
    }

    #[test]
    fn test_metadata_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = ModelMetadata::load(file.path()).unwrap_err();
        assert!(matches!(err, ModelLoadError::Metadata { .. }));
    }

    #[test]
    fn test_load_missing_model() {
        let err = ModelHandle::load(
            Path::new("no/such/model.onnx"),
            Path::new("no/such/model.json"),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, ModelLoadError::NotFound(_)));
    }
}
