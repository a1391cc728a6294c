//! Architecture synthesis
//!
//! Pure mapping from (project, requirements) to an architecture descriptor.
//! The dependency manifest starts from a fixed frontend baseline and is
//! extended by a static requirement-to-package lookup; a backend component is
//! appended only when the requirements call for one.

use crate::model::{
    ArchitectureDescriptor, Component, ComponentKind, FileNode, ProjectDescriptor, TechStack,
};
use crate::requirements::{Feature, RequirementsSet};
use std::collections::BTreeMap;

/// Frontend dependency baseline present in every generated project
const FRONTEND_BASELINE: &[(&str, &str)] = &[("react", "^18.2.0"), ("react-dom", "^18.2.0")];

/// Static requirement -> package lookup
const FEATURE_PACKAGES: &[(Feature, &[(&str, &str)])] = &[
    (
        Feature::DragAndDrop,
        &[("@dnd-kit/core", "^6.1.0"), ("@dnd-kit/sortable", "^8.0.0")],
    ),
    (Feature::Charts, &[("recharts", "^2.10.0")]),
    (Feature::Notifications, &[("react-hot-toast", "^2.4.0")]),
    (Feature::Dashboard, &[("react-router-dom", "^6.21.0")]),
    (
        Feature::ApiBackend,
        &[("express", "^4.18.0"), ("cors", "^2.8.5")],
    ),
];

/// Synthesize an architecture descriptor for the project
pub fn synthesize(
    project: &ProjectDescriptor,
    requirements: &RequirementsSet,
) -> ArchitectureDescriptor {
    let mut components = vec![Component {
        name: "Frontend".to_string(),
        kind: ComponentKind::Frontend,
        description: "User interface built with React".to_string(),
        files: vec!["src/App.tsx".to_string(), "src/main.tsx".to_string()],
        dependencies: vec!["react".to_string(), "react-dom".to_string()],
    }];

    if requirements.has(Feature::ApiBackend) {
        components.push(Component {
            name: "Backend".to_string(),
            kind: ComponentKind::Backend,
            description: "API server built with Express".to_string(),
            files: vec!["server/index.ts".to_string()],
            dependencies: vec!["express".to_string(), "cors".to_string()],
        });
    }

    let mut dependencies: BTreeMap<String, String> = FRONTEND_BASELINE
        .iter()
        .map(|(name, version)| (name.to_string(), version.to_string()))
        .collect();

    for (feature, packages) in FEATURE_PACKAGES {
        if requirements.has(*feature) {
            for (name, version) in *packages {
                dependencies.insert(name.to_string(), version.to_string());
            }
        }
    }

    let backend = if requirements.has(Feature::ApiBackend) {
        vec!["node".to_string(), "express".to_string()]
    } else {
        Vec::new()
    };

    let tech_stack = TechStack {
        frontend: vec![
            "react".to_string(),
            "typescript".to_string(),
            "vite".to_string(),
            "tailwindcss".to_string(),
        ],
        backend,
        database: Vec::new(),
        testing: vec!["vitest".to_string()],
        deployment: vec!["docker".to_string()],
    };

    ArchitectureDescriptor {
        overview: format!(
            "A {} application built around {} feature(s): {}",
            project.project_type,
            requirements.features.len(),
            requirements
                .features
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        components,
        dependencies,
        file_structure: skeleton(&project.name),
        tech_stack,
    }
}

/// Minimal skeleton emitted at synthesis time; after file generation the
/// lifecycle replaces it with a tree derived from the real file list.
fn skeleton(project_name: &str) -> FileNode {
    let mut root = FileNode::directory(project_name, "/");
    root.children = vec![
        FileNode::directory("src", "/src"),
        FileNode::directory("public", "/public"),
        FileNode::file("package.json", "/package.json"),
    ];
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::extract;

    fn project(description: &str) -> ProjectDescriptor {
        ProjectDescriptor::new("Test", description)
    }

    #[test]
    fn test_frontend_always_present() {
        let p = project("anything");
        let arch = synthesize(&p, &extract("anything", &[]));

        assert_eq!(arch.components[0].kind, ComponentKind::Frontend);
        assert_eq!(arch.dependencies.get("react"), Some(&"^18.2.0".to_string()));
        assert_eq!(
            arch.dependencies.get("react-dom"),
            Some(&"^18.2.0".to_string())
        );
    }

    #[test]
    fn test_backend_only_with_api_requirement() {
        let p = project("a todo app with dark mode");
        let arch = synthesize(&p, &extract(&p.description, &[]));
        assert!(arch
            .components
            .iter()
            .all(|c| c.kind != ComponentKind::Backend));
        assert!(arch.tech_stack.backend.is_empty());
        assert!(!arch.dependencies.contains_key("express"));

        let p = project("a todo app with an api backend");
        let arch = synthesize(&p, &extract(&p.description, &[]));
        assert!(arch
            .components
            .iter()
            .any(|c| c.kind == ComponentKind::Backend));
        assert_eq!(arch.tech_stack.backend, vec!["node", "express"]);
        assert!(arch.dependencies.contains_key("express"));
        assert!(arch.dependencies.contains_key("cors"));
    }

    #[test]
    fn test_feature_packages_extend_manifest() {
        let p = project("a kanban board with drag and drop plus charts and toast notifications");
        let arch = synthesize(&p, &extract(&p.description, &[]));

        assert!(arch.dependencies.contains_key("@dnd-kit/core"));
        assert!(arch.dependencies.contains_key("@dnd-kit/sortable"));
        assert!(arch.dependencies.contains_key("recharts"));
        assert!(arch.dependencies.contains_key("react-hot-toast"));
    }

    #[test]
    fn test_skeleton_shape() {
        let p = project("plain");
        let arch = synthesize(&p, &extract("plain", &[]));

        let names: Vec<&str> = arch
            .file_structure
            .children
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["src", "public", "package.json"]);
    }

    #[test]
    fn test_fixed_stack_lists() {
        let p = project("plain");
        let arch = synthesize(&p, &extract("plain", &[]));

        assert_eq!(
            arch.tech_stack.frontend,
            vec!["react", "typescript", "vite", "tailwindcss"]
        );
        assert_eq!(arch.tech_stack.testing, vec!["vitest"]);
        assert_eq!(arch.tech_stack.deployment, vec!["docker"]);
    }
}
