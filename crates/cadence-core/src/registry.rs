use crate::error::SchemaError;
use crate::schema::ToolSpecification;
use serde_json::Value;
use std::collections::HashMap;
use std::collections::HashSet;

/// Catalog of tool specifications, keyed by name.
///
/// Registration happens once at process start; the registry is read-only
/// afterwards and is typically shared between sessions behind an `Arc`.
/// Every specification is checked on the way in, so a malformed entry
/// (for example a required field that is not a declared property) is a
/// startup failure rather than a surprise on first use.
///
/// # Example
///
/// ```rust
/// use cadence_core::{PropertyType, ToolRegistry, ToolSpecification};
///
/// let mut registry = ToolRegistry::new();
/// registry
///     .register(
///         ToolSpecification::builder("get_board_id", "Look up a board id")
///             .property("board_name", PropertyType::String, "the board name.")
///             .required("board_name")
///             .with_heartbeat()
///             .build(),
///     )
///     .expect("valid specification");
///
/// assert!(registry.get("get_board_id").is_ok());
/// assert!(registry.get("missing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    specs: Vec<ToolSpecification>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a specification to the catalog.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidToolName`] for empty or whitespace-bearing names
    /// - [`SchemaError::DuplicateToolName`] if the name is already present
    /// - [`SchemaError::DuplicateProperty`] if a property name repeats
    /// - [`SchemaError::UnknownRequiredField`] if a required entry is not a
    ///   declared property
    pub fn register(&mut self, spec: ToolSpecification) -> Result<(), SchemaError> {
        check_specification(&spec)?;

        if self.index.contains_key(spec.name()) {
            return Err(SchemaError::DuplicateToolName {
                name: spec.name().to_string(),
            });
        }

        tracing::debug!(
            tool = %spec.name(),
            properties = spec.properties().len(),
            heartbeat = spec.supports_heartbeat(),
            "Registered tool specification"
        );

        self.index.insert(spec.name().to_string(), self.specs.len());
        self.specs.push(spec);
        Ok(())
    }

    /// Register several specifications, stopping at the first failure.
    ///
    /// Specifications registered before the failing one stay registered.
    pub fn register_all<I>(&mut self, specs: I) -> Result<(), SchemaError>
    where
        I: IntoIterator<Item = ToolSpecification>,
    {
        for spec in specs {
            self.register(spec)?;
        }
        Ok(())
    }

    /// Builder-style registration.
    pub fn with_spec(mut self, spec: ToolSpecification) -> Result<Self, SchemaError> {
        self.register(spec)?;
        Ok(self)
    }

    /// Look up a specification by name.
    pub fn get(&self, name: &str) -> Result<&ToolSpecification, SchemaError> {
        self.index
            .get(name)
            .map(|&i| &self.specs[i])
            .ok_or_else(|| SchemaError::UnknownTool {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Specifications in registration order.
    ///
    /// Each call starts a fresh pass, and the returned iterator is `Clone`,
    /// so the sequence can be walked as many times as needed.
    pub fn list(&self) -> std::slice::Iter<'_, ToolSpecification> {
        self.specs.iter()
    }

    /// Tool names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + Clone {
        self.specs.iter().map(|s| s.name())
    }

    /// The model-facing capability listing, in registration order.
    pub fn capability_listing(&self) -> Vec<Value> {
        self.list().map(ToolSpecification::to_capability).collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<'a> IntoIterator for &'a ToolRegistry {
    type Item = &'a ToolSpecification;
    type IntoIter = std::slice::Iter<'a, ToolSpecification>;

    fn into_iter(self) -> Self::IntoIter {
        self.list()
    }
}

fn check_specification(spec: &ToolSpecification) -> Result<(), SchemaError> {
    let name = spec.name();
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(SchemaError::InvalidToolName {
            name: name.to_string(),
        });
    }

    let mut declared = HashSet::with_capacity(spec.properties().len());
    for property in spec.properties() {
        if !declared.insert(property.name.as_str()) {
            return Err(SchemaError::DuplicateProperty {
                tool: name.to_string(),
                property: property.name.clone(),
            });
        }
    }

    // Catches tokens like "board_idrequest_heartbeat" produced by adjacent
    // string literals being glued together.
    if let Some(field) = spec.required().iter().find(|r| !declared.contains(r.as_str())) {
        return Err(SchemaError::UnknownRequiredField {
            tool: name.to_string(),
            field: field.clone(),
        });
    }

    Ok(())
}
