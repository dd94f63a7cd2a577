//! Metamodel build configuration.

/// What to do with an attribute whose mapping shape the metamodel cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedFeaturePolicy {
    /// Abort the whole build.
    #[default]
    Fail,
    /// Log a warning and leave the attribute out of the metamodel.
    ///
    /// Only any-typed associations and arrays can be ignored; unrecognized
    /// containers and identifier attributes always fail.
    Ignore,
}

/// Configuration for building a [`Metamodel`](crate::Metamodel).
#[derive(Debug, Clone, Default)]
pub struct MetamodelConfig {
    /// Handling of unsupported attribute shapes.
    pub unsupported: UnsupportedFeaturePolicy,

    /// Whether synthetic properties (backrefs, index columns) become attributes.
    pub include_synthetic: bool,
}

impl MetamodelConfig {
    /// Create the default configuration: fail on unsupported shapes, hide synthetic properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that skips unsupported attributes instead of failing.
    pub fn lenient() -> Self {
        Self {
            unsupported: UnsupportedFeaturePolicy::Ignore,
            ..Default::default()
        }
    }

    /// Set the unsupported-feature policy.
    pub fn unsupported(mut self, policy: UnsupportedFeaturePolicy) -> Self {
        self.unsupported = policy;
        self
    }

    /// Set whether synthetic properties are included.
    pub fn include_synthetic(mut self, include: bool) -> Self {
        self.include_synthetic = include;
        self
    }

    pub(crate) fn ignores_unsupported(&self) -> bool {
        self.unsupported == UnsupportedFeaturePolicy::Ignore
    }
}
