//! Render-type checking options.
//!
//! Options are plain data supplied by the host (a lint configuration, an
//! editor setting, a test). They can be deserialized from JSON using the
//! camelCase field names below.

use rendu_carton::{CompactString, FxHashMap};
use serde::{Deserialize, Serialize};

/// Default bound for transparent unwrapping and render chain walks.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Errors raised while loading options.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// The options document is not valid JSON for this shape.
    #[error("invalid render-types options: {0}")]
    Json(#[from] serde_json::Error),

    /// A zero depth disables render chains and transparent unwrapping,
    /// leaving only direct matches.
    #[error("maxDepth must be at least 1")]
    ZeroDepth,
}

/// Options for render-type checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderTypesOptions {
    /// Components that are transparent without an in-source `@transparent`
    #[serde(default)]
    pub transparent_components: Vec<TransparentComponentOption>,

    /// Higher-order wrappers whose first argument is the component function
    #[serde(default = "default_component_wrappers")]
    pub component_wrappers: Vec<CompactString>,

    /// Bound for transparent unwrapping and render chain walks
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Import specifier prefixes mapped to project directories (`"@/": "src/"`)
    #[serde(default)]
    pub path_aliases: FxHashMap<CompactString, CompactString>,
}

/// A configured transparent component: a bare name (passing through
/// `children`) or a name with an explicit prop list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransparentComponentOption {
    Name(CompactString),
    Detailed {
        name: CompactString,
        #[serde(default)]
        props: Vec<CompactString>,
    },
}

impl TransparentComponentOption {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Detailed { name, .. } => name,
        }
    }

    /// Pass-through props; `children` when none are listed.
    pub fn props(&self) -> Vec<CompactString> {
        match self {
            Self::Detailed { props, .. } if !props.is_empty() => props.clone(),
            _ => vec![CompactString::const_new("children")],
        }
    }
}

fn default_component_wrappers() -> Vec<CompactString> {
    vec![
        CompactString::const_new("forwardRef"),
        CompactString::const_new("memo"),
        CompactString::const_new("React.forwardRef"),
        CompactString::const_new("React.memo"),
    ]
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for RenderTypesOptions {
    fn default() -> Self {
        Self {
            transparent_components: Vec::new(),
            component_wrappers: default_component_wrappers(),
            max_depth: DEFAULT_MAX_DEPTH,
            path_aliases: FxHashMap::default(),
        }
    }
}

impl RenderTypesOptions {
    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(json)?;
        if options.max_depth == 0 {
            return Err(OptionsError::ZeroDepth);
        }
        Ok(options)
    }

    /// Add a transparent component passing through `children`.
    pub fn with_transparent(mut self, name: impl Into<CompactString>) -> Self {
        self.transparent_components
            .push(TransparentComponentOption::Name(name.into()));
        self
    }

    /// Add a transparent component with explicit pass-through props.
    pub fn with_transparent_props<I, S>(mut self, name: impl Into<CompactString>, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.transparent_components
            .push(TransparentComponentOption::Detailed {
                name: name.into(),
                props: props.into_iter().map(Into::into).collect(),
            });
        self
    }

    /// Add a higher-order component wrapper.
    pub fn with_wrapper(mut self, wrapper: impl Into<CompactString>) -> Self {
        self.component_wrappers.push(wrapper.into());
        self
    }

    /// Set the depth bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Map an import prefix to a project directory.
    pub fn with_path_alias(
        mut self,
        prefix: impl Into<CompactString>,
        target: impl Into<CompactString>,
    ) -> Self {
        self.path_aliases.insert(prefix.into(), target.into());
        self
    }

    /// Whether `callee` (as written, e.g. `React.memo`) is a configured wrapper.
    pub fn is_component_wrapper(&self, callee: &str) -> bool {
        self.component_wrappers.iter().any(|wrapper| wrapper == callee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = RenderTypesOptions::default();
        assert!(opts.transparent_components.is_empty());
        assert_eq!(opts.max_depth, 10);
        assert!(opts.is_component_wrapper("forwardRef"));
        assert!(opts.is_component_wrapper("React.memo"));
        assert!(!opts.is_component_wrapper("observer"));
        assert!(opts.path_aliases.is_empty());
    }

    #[test]
    fn test_from_json() {
        let opts = RenderTypesOptions::from_json(
            r#"{
                "transparentComponents": [
                    "Suspense",
                    { "name": "Slot", "props": ["content", "fallback"] },
                    { "name": "Box" }
                ],
                "maxDepth": 4,
                "pathAliases": { "@/": "src/" }
            }"#,
        )
        .unwrap();

        assert_eq!(opts.transparent_components.len(), 3);
        assert_eq!(opts.transparent_components[0].name(), "Suspense");
        assert_eq!(opts.transparent_components[0].props(), vec!["children"]);
        assert_eq!(
            opts.transparent_components[1].props(),
            vec!["content", "fallback"]
        );
        assert_eq!(opts.transparent_components[2].props(), vec!["children"]);
        assert_eq!(opts.max_depth, 4);
        assert_eq!(opts.path_aliases.get("@/").map(|s| s.as_str()), Some("src/"));
        // Missing field keeps the default wrappers
        assert!(opts.is_component_wrapper("memo"));
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            RenderTypesOptions::from_json("{ \"maxDepth\": 0 }"),
            Err(OptionsError::ZeroDepth)
        ));
        assert!(matches!(
            RenderTypesOptions::from_json("{ \"maxDepth\": \"deep\" }"),
            Err(OptionsError::Json(_))
        ));
    }

    #[test]
    fn test_builders() {
        let opts = RenderTypesOptions::default()
            .with_transparent("Layout")
            .with_transparent_props("Slot", ["content"])
            .with_wrapper("observer")
            .with_max_depth(3);

        assert_eq!(opts.transparent_components.len(), 2);
        assert!(opts.is_component_wrapper("observer"));
        assert_eq!(opts.max_depth, 3);
    }
}
