//! Conversion options.

use crate::estree::SourceType;
use serde::Deserialize;

/// Options for a conversion run.
///
/// Loadable from TOML; missing keys take their defaults:
///
/// ```toml
/// file_name = "module.ts"
/// source_type = "module"
/// target = "esnext"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Label written to every node's `loc.source`.
    pub file_name: String,
    /// `sourceType` reported on the `Program` node.
    pub source_type: SourceType,
    /// Language version the source is written for.
    ///
    /// Advisory: the grammar accepts the latest syntax whatever the target,
    /// so this is carried into logs but does not reject newer constructs.
    pub target: EcmaTarget,
}

/// ECMAScript language version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum EcmaTarget {
    Es5,
    #[serde(alias = "es6")]
    #[cfg_attr(feature = "cli", value(alias = "es6"))]
    Es2015,
    #[default]
    #[cfg_attr(feature = "cli", value(name = "esnext"))]
    EsNext,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            file_name: "module.ts".to_string(),
            source_type: SourceType::Module,
            target: EcmaTarget::EsNext,
        }
    }
}

impl ConvertOptions {
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    pub fn with_target(mut self, target: EcmaTarget) -> Self {
        self.target = target;
        self
    }
}
