//! Shared fixtures for unit tests.

use rendu_relief::RenderTypesOptions;

use crate::project::Project;

/// A project built from `(path, source)` pairs with default options.
pub(crate) fn project(files: &[(&str, &str)]) -> Project {
    project_with(RenderTypesOptions::default(), files)
}

pub(crate) fn project_with(options: RenderTypesOptions, files: &[(&str, &str)]) -> Project {
    let mut project = Project::new(options);
    for (path, source) in files {
        project.add_source(path, source).unwrap();
    }
    project
}
