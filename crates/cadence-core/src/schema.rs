//! # Tool Specifications
//!
//! A [`ToolSpecification`] describes one capability the model may request:
//! its name, a description and an ordered list of primitive-typed
//! properties, some of which are required.
//!
//! Specifications serialize to the capability listing format understood by
//! the hosting model provider:
//!
//! ```json
//! {
//!   "name": "get_jira",
//!   "description": "...",
//!   "parameters": {
//!     "type": "object",
//!     "properties": { "issue_key": { "type": "string", "description": "..." } },
//!     "required": ["issue_key"]
//!   }
//! }
//! ```
//!
//! Property order is significant and survives serialization in both
//! directions.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};
use std::fmt;

/// Name of the per-call flag requesting an immediate follow-up turn.
pub const HEARTBEAT_FIELD: &str = "request_heartbeat";

/// Name of the paging argument shared by search-style tools.
pub const PAGE_FIELD: &str = "page";

/// Description attached to every `request_heartbeat` property.
pub const HEARTBEAT_DESCRIPTION: &str = "Request an immediate heartbeat after function execution. Set to 'true' if you want to send a follow-up message or run a follow-up function.";

/// Primitive types a tool property can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Integer,
    Boolean,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
            PropertyType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named parameter of a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub kind: PropertyType,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PropertySchema {
    #[serde(rename = "type")]
    kind: PropertyType,
    #[serde(default)]
    description: String,
}

/// Immutable description of a tool, keyed by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CapabilityDescriptor", into = "CapabilityDescriptor")]
pub struct ToolSpecification {
    name: String,
    description: String,
    properties: Vec<Property>,
    required: Vec<String>,
}

impl ToolSpecification {
    /// Start building a specification.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cadence_core::{PropertyType, ToolSpecification};
    ///
    /// let spec = ToolSpecification::builder("get_jira", "Fetch an issue")
    ///     .property("issue_key", PropertyType::String, "The issue key")
    ///     .required("issue_key")
    ///     .with_heartbeat()
    ///     .build();
    ///
    /// assert_eq!(spec.required(), ["issue_key", "request_heartbeat"]);
    /// ```
    pub fn builder(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> ToolSpecificationBuilder {
        ToolSpecificationBuilder {
            name: name.into(),
            description: description.into(),
            properties: Vec::new(),
            required: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Required property names in declaration order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Whether calls to this tool can ask for an immediate follow-up turn.
    ///
    /// Tools without a `request_heartbeat` property (the user-facing
    /// message tool, for instance) never continue automatically.
    pub fn supports_heartbeat(&self) -> bool {
        self.property(HEARTBEAT_FIELD).is_some()
    }

    /// Argument names present in `raw` that this specification does not declare.
    pub fn unrecognized<'a>(&self, raw: &'a Map<String, Value>) -> Vec<&'a str> {
        raw.keys()
            .filter(|key| self.property(key).is_none())
            .map(String::as_str)
            .collect()
    }

    /// Render the entry of the model-facing capability listing.
    pub fn to_capability(&self) -> Value {
        let mut properties = Map::new();
        for property in &self.properties {
            properties.insert(
                property.name.clone(),
                json!({
                    "type": property.kind.as_str(),
                    "description": property.description,
                }),
            );
        }

        json!({
            "name": self.name,
            "description": self.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": self.required,
            }
        })
    }
}

/// Builder for [`ToolSpecification`].
///
/// The builder does not check the required list against the declared
/// properties; the registry does that when the tool specification is registered.
#[derive(Debug, Clone)]
pub struct ToolSpecificationBuilder {
    name: String,
    description: String,
    properties: Vec<Property>,
    required: Vec<String>,
}

impl ToolSpecificationBuilder {
    pub fn property(
        mut self,
        name: impl Into<String>,
        kind: PropertyType,
        description: impl Into<String>,
    ) -> Self {
        self.properties.push(Property {
            name: name.into(),
            kind,
            description: description.into(),
        });
        self
    }

    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn required_all<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declare the `request_heartbeat` flag and mark it required.
    pub fn with_heartbeat(self) -> Self {
        self.property(HEARTBEAT_FIELD, PropertyType::Boolean, HEARTBEAT_DESCRIPTION)
            .required(HEARTBEAT_FIELD)
    }

    pub fn build(self) -> ToolSpecification {
        ToolSpecification {
            name: self.name,
            description: self.description,
            properties: self.properties,
            required: self.required,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CapabilityDescriptor {
    name: String,
    #[serde(default)]
    description: String,
    parameters: ParameterSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ParameterSchema {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    properties: OrderedProperties,
    #[serde(default)]
    required: Vec<String>,
}

/// Property map that keeps document order and repeated keys, so the
/// registry can report duplicates instead of silently keeping the last one.
#[derive(Debug, Clone, Default)]
struct OrderedProperties(Vec<(String, PropertySchema)>);

impl Serialize for OrderedProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in &self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OrderedProperties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = OrderedProperties;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of property name to {type, description}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, schema)) = access.next_entry::<String, PropertySchema>()? {
                    entries.push((name, schema));
                }
                Ok(OrderedProperties(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

impl TryFrom<CapabilityDescriptor> for ToolSpecification {
    type Error = String;

    fn try_from(descriptor: CapabilityDescriptor) -> Result<Self, Self::Error> {
        if descriptor.parameters.kind != "object" {
            return Err(format!(
                "parameters of tool '{}' must have type \"object\", found \"{}\"",
                descriptor.name, descriptor.parameters.kind
            ));
        }

        let properties = descriptor
            .parameters
            .properties
            .0
            .into_iter()
            .map(|(name, schema)| Property {
                name,
                kind: schema.kind,
                description: schema.description,
            })
            .collect();

        Ok(ToolSpecification {
            name: descriptor.name,
            description: descriptor.description,
            properties,
            required: descriptor.parameters.required,
        })
    }
}

impl From<ToolSpecification> for CapabilityDescriptor {
    fn from(spec: ToolSpecification) -> Self {
        CapabilityDescriptor {
            name: spec.name,
            description: spec.description,
            parameters: ParameterSchema {
                kind: "object".to_string(),
                properties: OrderedProperties(
                    spec.properties
                        .into_iter()
                        .map(|p| {
                            (
                                p.name,
                                PropertySchema {
                                    kind: p.kind,
                                    description: p.description,
                                },
                            )
                        })
                        .collect(),
                ),
                required: spec.required,
            },
        }
    }
}
