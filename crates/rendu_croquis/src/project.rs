//! In-memory project of module summaries.
//!
//! [`Project`] is the default [`ModuleHost`]: it owns every lowered module,
//! resolves relative and aliased specifiers against the modules it holds,
//! and skips re-lowering a source whose content did not change.

use rendu_armature::{parse_module, ArmatureError};
use rendu_carton::{
    format_compact,
    hash::hash_str,
    path::{is_relative_specifier, join_specifier, normalize_path},
    CompactString, FilePath, FxHashMap,
};
use rendu_relief::{ModuleSummary, RenderTypesOptions};

use crate::analysis::RenderAnalyzer;
use crate::context::ResolutionContext;
use crate::resolver::ModuleHost;

/// Suffixes tried, in order, when resolving a specifier to a module.
const CANDIDATE_SUFFIXES: &[&str] = &[
    "",
    ".tsx",
    ".ts",
    ".jsx",
    ".js",
    "/index.tsx",
    "/index.ts",
    "/index.jsx",
    "/index.js",
];

/// Modules of one project, keyed by normalized path.
#[derive(Debug, Default)]
pub struct Project {
    options: RenderTypesOptions,
    modules: FxHashMap<FilePath, ModuleSummary>,
    /// Content hashes of modules added from source
    hashes: FxHashMap<FilePath, u64>,
}

impl Project {
    pub fn new(options: RenderTypesOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Lower and add a source module.
    ///
    /// Returns `false` when the module was already present with identical
    /// content and nothing was re-lowered.
    pub fn add_source(&mut self, path: &str, source: &str) -> Result<bool, ArmatureError> {
        let path = normalize_path(path);
        let hash = hash_str(source);
        if self.hashes.get(&path) == Some(&hash) {
            tracing::debug!(path = %path, "module unchanged, skipping");
            return Ok(false);
        }

        let module = parse_module(&path, source, &self.options)?;
        self.modules.insert(path.clone(), module);
        self.hashes.insert(path, hash);
        Ok(true)
    }

    /// Add a summary built by the host.
    pub fn add_module(&mut self, mut module: ModuleSummary) {
        let path = normalize_path(&module.path);
        module.path = path.clone();
        self.hashes.remove(&path);
        self.modules.insert(path, module);
    }

    pub fn remove(&mut self, path: &str) -> Option<ModuleSummary> {
        let path = normalize_path(path);
        self.hashes.remove(&path);
        self.modules.remove(&path)
    }

    /// Normalized paths of every module, sorted.
    pub fn paths(&self) -> Vec<FilePath> {
        let mut paths: Vec<FilePath> = self.modules.keys().cloned().collect();
        paths.sort();
        paths
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Analyzer over this project sharing `context` for the run.
    pub fn analyzer<'a>(&'a self, context: &'a ResolutionContext) -> RenderAnalyzer<'a> {
        RenderAnalyzer::new(self, context)
    }

    /// Map an aliased specifier (`@/ui/Header`) to a project path. The
    /// longest matching prefix wins.
    fn expand_alias(&self, specifier: &str) -> Option<CompactString> {
        self.options
            .path_aliases
            .iter()
            .filter(|(prefix, _)| specifier.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, target)| {
                let rest = &specifier[prefix.len()..];
                let joined = if target.ends_with('/') || rest.starts_with('/') || rest.is_empty() {
                    format!("{target}{rest}")
                } else {
                    format!("{target}/{rest}")
                };
                normalize_path(&joined)
            })
    }
}

impl ModuleHost for Project {
    fn module(&self, path: &str) -> Option<&ModuleSummary> {
        self.modules.get(path)
    }

    fn resolve_specifier(&self, importer: &str, specifier: &str) -> Option<FilePath> {
        let base = if is_relative_specifier(specifier) {
            join_specifier(importer, specifier)
        } else {
            // Bare package specifiers are never project modules
            self.expand_alias(specifier)?
        };

        CANDIDATE_SUFFIXES.iter().find_map(|suffix| {
            let candidate = if suffix.is_empty() {
                base.clone()
            } else {
                format_compact!("{base}{suffix}")
            };
            self.modules.contains_key(&candidate).then_some(candidate)
        })
    }

    fn options(&self) -> &RenderTypesOptions {
        &self.options
    }
}
