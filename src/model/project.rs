//! Project descriptor, architecture, generated files, and build/test outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Closed set of project shapes the generator knows how to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    #[serde(rename = "react-web-app")]
    ReactWebApp,
    #[serde(rename = "vue-web-app")]
    VueWebApp,
    #[serde(rename = "node-rest-api")]
    NodeRestApi,
    #[serde(rename = "python-rest-api")]
    PythonRestApi,
    #[serde(rename = "static-website")]
    StaticWebsite,
    #[serde(rename = "cli-tool")]
    CliTool,
}

impl ProjectType {
    /// Infer the project type from a free-text description
    ///
    /// Keyword checks run in priority order; the first match wins and the
    /// default is a React web app.
    pub fn infer(description: &str) -> Self {
        let text = description.to_lowercase();

        if text.contains("react") || text.contains("web app") {
            return ProjectType::ReactWebApp;
        }
        if text.contains("vue") {
            return ProjectType::VueWebApp;
        }
        if text.contains("api") || text.contains("backend") || text.contains("server") {
            if text.contains("python") {
                return ProjectType::PythonRestApi;
            }
            return ProjectType::NodeRestApi;
        }
        if text.contains("static") || text.contains("landing page") || text.contains("website") {
            return ProjectType::StaticWebsite;
        }
        if text.contains("cli") || text.contains("command line") || text.contains("tool") {
            return ProjectType::CliTool;
        }

        ProjectType::ReactWebApp
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::ReactWebApp => "react-web-app",
            ProjectType::VueWebApp => "vue-web-app",
            ProjectType::NodeRestApi => "node-rest-api",
            ProjectType::PythonRestApi => "python-rest-api",
            ProjectType::StaticWebsite => "static-website",
            ProjectType::CliTool => "cli-tool",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a project
///
/// `ready` is re-enterable (build/test cycles run again from it); `failed`
/// is absorbing until an explicit generate/build retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Initializing,
    GatheringRequirements,
    Planning,
    Generating,
    Building,
    Testing,
    Ready,
    Failed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Initializing => "initializing",
            ProjectStatus::GatheringRequirements => "gathering_requirements",
            ProjectStatus::Planning => "planning",
            ProjectStatus::Generating => "generating",
            ProjectStatus::Building => "building",
            ProjectStatus::Testing => "testing",
            ProjectStatus::Ready => "ready",
            ProjectStatus::Failed => "failed",
        }
    }

    /// A pipeline run (generate or build) is currently owning this project
    pub fn is_pipeline_active(&self) -> bool {
        matches!(
            self,
            ProjectStatus::Planning
                | ProjectStatus::Generating
                | ProjectStatus::Building
                | ProjectStatus::Testing
        )
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root record for a generated project, owned by the lifecycle service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    /// Accumulated requirement tags (feature vocabulary plus tech preferences)
    pub requirements: Vec<String>,
    pub architecture: Option<ArchitectureDescriptor>,
    pub files: Vec<GeneratedFile>,
    pub build_output: Option<BuildOutcome>,
    pub test_results: Option<TestOutcome>,
    /// Message of the error that moved the project to `failed`, if any
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        let description = description.into();
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            project_type: ProjectType::infer(&description),
            name,
            description,
            status: ProjectStatus::Initializing,
            requirements: Vec::new(),
            architecture: None,
            files: Vec::new(),
            build_output: None,
            test_results: None,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Kind of an architecture component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Frontend,
    Backend,
    Database,
    Service,
    Utility,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub description: String,
    pub files: Vec<String>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileNodeKind {
    File,
    Directory,
}

/// Recursive file-tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileNodeKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileNode>,
}

impl FileNode {
    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FileNodeKind::Directory,
            path: path.into(),
            children: Vec::new(),
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FileNodeKind::File,
            path: path.into(),
            children: Vec::new(),
        }
    }

    /// Derive a file tree from the actual generated file list
    ///
    /// Children are ordered directories-first, then alphabetically, so the
    /// tree is deterministic regardless of generation order.
    pub fn from_files(root_name: &str, files: &[GeneratedFile]) -> Self {
        let mut root = FileNode::directory(root_name, "/");

        for file in files {
            root.insert_path(&file.path);
        }

        root.sort_children();
        root
    }

    fn insert_path(&mut self, relative: &str) {
        let mut node = self;
        let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();

        for (i, segment) in segments.iter().enumerate() {
            let is_last = i == segments.len() - 1;
            let child_path = if node.path == "/" {
                format!("/{}", segment)
            } else {
                format!("{}/{}", node.path, segment)
            };

            let position = node.children.iter().position(|c| c.name == *segment);
            let index = match position {
                Some(index) => index,
                None => {
                    let child = if is_last {
                        FileNode::file(*segment, child_path)
                    } else {
                        FileNode::directory(*segment, child_path)
                    };
                    node.children.push(child);
                    node.children.len() - 1
                }
            };

            node = &mut node.children[index];
        }
    }

    fn sort_children(&mut self) {
        self.children
            .sort_by_key(|c| (c.kind == FileNodeKind::File, c.name.clone()));
        for child in &mut self.children {
            child.sort_children();
        }
    }
}

/// Frontend/backend/database/testing/deployment tag lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechStack {
    pub frontend: Vec<String>,
    pub backend: Vec<String>,
    pub database: Vec<String>,
    pub testing: Vec<String>,
    pub deployment: Vec<String>,
}

/// Synthesized architecture for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitectureDescriptor {
    pub overview: String,
    pub components: Vec<Component>,
    /// Package name -> version requirement; BTreeMap keeps manifest output stable
    pub dependencies: BTreeMap<String, String>,
    pub file_structure: FileNode,
    pub tech_stack: TechStack,
}

/// One file produced by the synthesizer
///
/// Paths are relative, POSIX-style, and unique within a project. Containment
/// inside the materialization root is enforced at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
    pub language: String,
    pub purpose: String,
}

impl GeneratedFile {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        language: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            language: language.into(),
            purpose: purpose.into(),
        }
    }
}

/// Captured result of an install+build run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOutcome {
    pub success: bool,
    pub logs: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub artifacts: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuite {
    pub name: String,
    pub tests: Vec<TestCase>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coverage {
    pub lines: f32,
    pub functions: f32,
    pub branches: f32,
    pub statements: f32,
}

/// Captured result of a test run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    pub success: bool,
    pub total_tests: u32,
    pub passed_tests: u32,
    pub failed_tests: u32,
    pub test_suites: Vec<TestSuite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Coverage>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_react_default() {
        assert_eq!(ProjectType::infer("a thing"), ProjectType::ReactWebApp);
        assert_eq!(
            ProjectType::infer("a React dashboard"),
            ProjectType::ReactWebApp
        );
    }

    #[test]
    fn test_infer_priority_order() {
        // "api" + "python" goes to the Python variant
        assert_eq!(
            ProjectType::infer("a python api for orders"),
            ProjectType::PythonRestApi
        );
        assert_eq!(
            ProjectType::infer("a backend server"),
            ProjectType::NodeRestApi
        );
        assert_eq!(ProjectType::infer("a vue spa"), ProjectType::VueWebApp);
        assert_eq!(
            ProjectType::infer("a static landing page"),
            ProjectType::StaticWebsite
        );
        assert_eq!(
            ProjectType::infer("a command line utility"),
            ProjectType::CliTool
        );
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ProjectStatus::GatheringRequirements).unwrap();
        assert_eq!(json, "\"gathering_requirements\"");

        let parsed: ProjectStatus = serde_json::from_str("\"ready\"").unwrap();
        assert_eq!(parsed, ProjectStatus::Ready);
    }

    #[test]
    fn test_project_type_serialization() {
        let json = serde_json::to_string(&ProjectType::ReactWebApp).unwrap();
        assert_eq!(json, "\"react-web-app\"");
    }

    #[test]
    fn test_new_project_defaults() {
        let project = ProjectDescriptor::new("Todo", "A todo web app");
        assert_eq!(project.status, ProjectStatus::Initializing);
        assert_eq!(project.project_type, ProjectType::ReactWebApp);
        assert!(project.architecture.is_none());
        assert!(project.files.is_empty());
    }

    #[test]
    fn test_file_tree_from_files() {
        let files = vec![
            GeneratedFile::new("src/App.tsx", "", "typescript", ""),
            GeneratedFile::new("src/components/Header.tsx", "", "typescript", ""),
            GeneratedFile::new("package.json", "", "json", ""),
            GeneratedFile::new("index.html", "", "html", ""),
        ];

        let tree = FileNode::from_files("todo", &files);
        assert_eq!(tree.path, "/");
        assert_eq!(tree.kind, FileNodeKind::Directory);

        // Directories sort before files
        assert_eq!(tree.children[0].name, "src");
        assert_eq!(tree.children[0].kind, FileNodeKind::Directory);
        assert_eq!(tree.children[1].name, "index.html");
        assert_eq!(tree.children[2].name, "package.json");

        let src = &tree.children[0];
        assert_eq!(src.children[0].name, "components");
        assert_eq!(src.children[0].children[0].path, "/src/components/Header.tsx");
        assert_eq!(src.children[1].name, "App.tsx");
    }

    #[test]
    fn test_file_tree_deterministic() {
        let a = vec![
            GeneratedFile::new("b.txt", "", "text", ""),
            GeneratedFile::new("a.txt", "", "text", ""),
        ];
        let b = vec![
            GeneratedFile::new("a.txt", "", "text", ""),
            GeneratedFile::new("b.txt", "", "text", ""),
        ];

        let ta = serde_json::to_string(&FileNode::from_files("p", &a)).unwrap();
        let tb = serde_json::to_string(&FileNode::from_files("p", &b)).unwrap();
        assert_eq!(ta, tb);
    }
}
