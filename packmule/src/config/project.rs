//! Project documents: the direct dependencies of one consuming project.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::manager::ManagerResult;
use crate::package::PackageVersion;
use crate::serializer;

/// A consuming project's declared dependencies.
///
/// ```json
/// { "Dependencies": [ { "Name": "foo", "Version": "1.0.0" } ] }
/// ```
///
/// Only these direct dependencies are ensured; dependencies declared by
/// their manifests are not followed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    /// Dependencies in declaration order.
    #[serde(default)]
    pub dependencies: Vec<PackageVersion>,
}

impl Project {
    /// Create a project from a dependency list.
    pub fn new(dependencies: Vec<PackageVersion>) -> Self {
        Self { dependencies }
    }

    /// Load a project document.
    pub fn load(path: &Path) -> ManagerResult<Self> {
        serializer::read_file(path)
    }

    /// Declared dependency for `name`, if any.
    pub fn dependency(&self, name: &str) -> Option<&PackageVersion> {
        self.dependencies.iter().find(|d| d.name == name)
    }

    /// Declare `dependency`, replacing any existing declaration with the same name.
    ///
    /// Returns the replaced declaration.
    pub fn declare(&mut self, dependency: PackageVersion) -> Option<PackageVersion> {
        match self.dependencies.iter_mut().find(|d| d.name == dependency.name) {
            Some(existing) => Some(std::mem::replace(existing, dependency)),
            None => {
                self.dependencies.push(dependency);
                None
            }
        }
    }

    /// Remove the exact declaration `dependency`. Returns whether it was present.
    pub fn undeclare(&mut self, dependency: &PackageVersion) -> bool {
        let before = self.dependencies.len();
        self.dependencies.retain(|d| d != dependency);
        self.dependencies.len() != before
    }

    /// Declare a dependency in the project document at `path`.
    pub fn add_dependency(
        path: &Path,
        dependency: PackageVersion,
    ) -> ManagerResult<Option<PackageVersion>> {
        serializer::modify(path, |project: &mut Project| Ok(project.declare(dependency)))
    }

    /// Remove a dependency from the project document at `path`.
    pub fn remove_dependency(path: &Path, dependency: &PackageVersion) -> ManagerResult<bool> {
        serializer::modify(path, |project: &mut Project| {
            Ok(project.undeclare(dependency))
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn pv(name: &str, version: &str) -> PackageVersion {
        PackageVersion::parse(name, version).unwrap()
    }

    #[test]
    fn test_deserialize_project() {
        let project: Project = serializer::read_str(
            r#"{"Dependencies": [{"Name": "foo", "Version": "1.0.0"}, {"Name": "bar", "Version": "0.2.0"}]}"#,
            "test",
        )
        .unwrap();

        assert_eq!(project.dependencies, vec![pv("foo", "1.0.0"), pv("bar", "0.2.0")]);
        assert_eq!(project.dependency("bar"), Some(&pv("bar", "0.2.0")));
    }

    #[test]
    fn test_empty_document_has_no_dependencies() {
        let project: Project = serializer::read_str("{}", "test").unwrap();
        assert!(project.dependencies.is_empty());
    }

    #[test]
    fn test_declare_replaces_same_name() {
        let mut project = Project::new(vec![pv("foo", "1.0.0"), pv("bar", "1.0.0")]);

        let replaced = project.declare(pv("foo", "2.0.0"));

        assert_eq!(replaced, Some(pv("foo", "1.0.0")));
        assert_eq!(project.dependencies, vec![pv("foo", "2.0.0"), pv("bar", "1.0.0")]);
        assert_eq!(project.declare(pv("baz", "0.1.0")), None);
        assert_eq!(project.dependencies.len(), 3);
    }

    #[test]
    fn test_undeclare_exact_match_only() {
        let mut project = Project::new(vec![pv("foo", "1.0.0")]);

        assert!(!project.undeclare(&pv("foo", "2.0.0")));
        assert!(project.undeclare(&pv("foo", "1.0.0")));
        assert!(project.dependencies.is_empty());
    }

    #[test]
    fn test_add_and_remove_dependency_in_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project.json");
        serializer::write_file(&path, &Project::default()).unwrap();

        Project::add_dependency(&path, pv("foo", "1.0.0")).unwrap();
        assert_eq!(Project::load(&path).unwrap().dependencies, vec![pv("foo", "1.0.0")]);

        assert!(Project::remove_dependency(&path, &pv("foo", "1.0.0")).unwrap());
        assert!(Project::load(&path).unwrap().dependencies.is_empty());
    }
}
