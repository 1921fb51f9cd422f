//! Loading and lookup of technique definitions.

use std::collections::HashSet;
use std::path::Path;

use crate::error::BreatheError;
use crate::technique::types::Technique;

const BUILTIN_TECHNIQUES: &str = include_str!("builtin.json");

/// A validated, ordered list of techniques.
///
/// Construction always validates, so every technique handed out by a catalog
/// has at least one step, positive step lengths and at least one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    techniques: Vec<Technique>,
}

impl Catalog {
    /// Build a catalog from already-parsed techniques.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::EmptyCatalog` for an empty list, or
    /// `BreatheError::InvalidTechnique` if any technique fails validation or
    /// an id appears twice.
    pub fn new(techniques: Vec<Technique>) -> Result<Self, BreatheError> {
        if techniques.is_empty() {
            return Err(BreatheError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        for technique in &techniques {
            technique.validate()?;
            if !seen.insert(technique.id.as_str()) {
                return Err(BreatheError::invalid(&technique.id, "duplicate id"));
            }
        }

        Ok(Self { techniques })
    }

    /// Parse a JSON array of techniques.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::Parse` for malformed JSON, or a validation error
    /// from [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, BreatheError> {
        let techniques: Vec<Technique> = serde_json::from_str(json)?;
        Self::new(techniques)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::Config` if the file cannot be read, otherwise
    /// whatever [`Catalog::from_json`] returns.
    pub fn load(path: &Path) -> Result<Self, BreatheError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BreatheError::Config(format!(
                "Failed to read techniques file {}: {e}",
                path.display()
            ))
        })?;

        let catalog = Self::from_json(&contents)?;
        tracing::debug!(path = %path.display(), count = catalog.len(), "Loaded techniques");
        Ok(catalog)
    }

    /// The techniques shipped with breathe.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded definitions are broken.
    pub fn builtin() -> Result<Self, BreatheError> {
        Self::from_json(BUILTIN_TECHNIQUES)
    }

    /// Look up a technique by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Technique> {
        self.techniques.iter().find(|t| t.id == id)
    }

    /// Index of a technique in load order.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.techniques.iter().position(|t| t.id == id)
    }

    /// Technique at an index in load order.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Technique> {
        self.techniques.get(index)
    }

    /// First technique in load order.
    #[must_use]
    pub fn first(&self) -> Option<&Technique> {
        self.techniques.first()
    }

    /// Iterate over techniques in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Technique> {
        self.techniques.iter()
    }

    /// Number of techniques.
    #[must_use]
    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    /// Always false for a constructed catalog; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"[
        {
            "id": "box",
            "name": "Box",
            "ratio": "4-4-4-2",
            "cycles": 3,
            "steps": [
                { "phase": "inhale", "seconds": 4 },
                { "phase": "hold", "seconds": 4 },
                { "phase": "exhale", "seconds": 4 },
                { "phase": "hold_after", "seconds": 2 }
            ]
        },
        {
            "id": "calm",
            "name": "Calm",
            "ratio": "4-6",
            "cycles": 5,
            "steps": [
                { "phase": "inhale", "seconds": 4 },
                { "phase": "exhale", "seconds": 6 }
            ]
        }
    ]"#;

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.first().unwrap().id, "box");
        assert_eq!(catalog.get("calm").unwrap().cycles, 5);
        assert_eq!(catalog.position("calm"), Some(1));
        assert!(catalog.get("missing").is_none());
        assert!(catalog.get("box").unwrap().description.is_empty());
    }

    #[test]
    fn test_empty_list_rejected() {
        let err = Catalog::from_json("[]").unwrap_err();
        assert!(matches!(err, BreatheError::EmptyCatalog));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let technique = Catalog::from_json(SAMPLE).unwrap().get("box").unwrap().clone();
        let err = Catalog::new(vec![technique.clone(), technique]).unwrap_err();
        assert!(err.to_string().contains("duplicate id"));
    }

    #[test]
    fn test_non_positive_seconds_rejected() {
        let json = SAMPLE.replace(r#""seconds": 6"#, r#""seconds": 0"#);
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(err, BreatheError::InvalidTechnique { ref id, .. } if id == "calm"));
    }

    #[test]
    fn test_huge_seconds_rejected() {
        for huge in ["1e19", "1e20", "1e300"] {
            let json = SAMPLE.replace(r#""seconds": 6"#, &format!(r#""seconds": {huge}"#));
            let err = Catalog::from_json(&json).unwrap_err();
            assert!(
                matches!(err, BreatheError::InvalidTechnique { ref id, .. } if id == "calm"),
                "{huge} accepted"
            );
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = Catalog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, BreatheError::Parse(_)));
    }

    #[test]
    fn test_missing_steps_is_parse_error() {
        let json = r#"[{ "id": "x", "name": "X", "ratio": "1", "cycles": 1 }]"#;
        assert!(matches!(
            Catalog::from_json(json).unwrap_err(),
            BreatheError::Parse(_)
        ));
    }

    #[test]
    fn test_builtin_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.len() >= 3);
        assert!(catalog.get("box").is_some());
        for technique in catalog.iter() {
            assert!(technique.validate().is_ok());
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/techniques.json")).unwrap_err();
        assert!(matches!(err, BreatheError::Config(_)));
    }
}
