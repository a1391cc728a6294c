//! File synthesis
//!
//! Deterministic mapping from (project, architecture, requirements) to the
//! ordered list of generated files. Calling `generate` twice with identical
//! inputs yields byte-identical output, which is what makes regeneration
//! reproducible.
//!
//! Generated source embeds the project name and description as plain template
//! substitutions. That text is user-controlled and is emitted verbatim into
//! the generated project, so it must never be interpreted by this process.
//! The only executable surface is the external build step, which is already
//! treated as untrusted (see `exec`).

mod components;
mod scaffold;

use crate::model::{ArchitectureDescriptor, GeneratedFile, ProjectDescriptor};
use crate::requirements::{Feature, RequirementsSet};
use serde_json::json;
use tracing::debug;

/// Dev-dependency baseline serialized into every package manifest
const DEV_DEPENDENCIES: &[(&str, &str)] = &[
    ("@types/react", "^18.2.0"),
    ("@types/react-dom", "^18.2.0"),
    ("@vitejs/plugin-react", "^4.2.0"),
    ("autoprefixer", "^10.4.0"),
    ("postcss", "^8.4.0"),
    ("tailwindcss", "^3.4.0"),
    ("typescript", "^5.3.0"),
    ("vite", "^5.0.0"),
    ("vitest", "^1.0.0"),
];

/// Generate the complete file list for a project
pub fn generate(
    project: &ProjectDescriptor,
    architecture: &ArchitectureDescriptor,
    requirements: &RequirementsSet,
) -> Vec<GeneratedFile> {
    let crud_ui = requirements.has(Feature::Crud) || requirements.has(Feature::DataDisplay);

    let mut files = vec![
        GeneratedFile::new(
            "package.json",
            package_json(project, architecture),
            "json",
            "Package configuration and dependencies",
        ),
        GeneratedFile::new(
            "vite.config.ts",
            scaffold::vite_config(),
            "typescript",
            "Vite build configuration",
        ),
        GeneratedFile::new(
            "tsconfig.json",
            scaffold::tsconfig(),
            "json",
            "TypeScript configuration",
        ),
        GeneratedFile::new(
            "tailwind.config.js",
            scaffold::tailwind_config(),
            "javascript",
            "Tailwind CSS configuration",
        ),
        GeneratedFile::new(
            "index.html",
            scaffold::index_html(&project.name),
            "html",
            "HTML entry point",
        ),
        GeneratedFile::new(
            "src/main.tsx",
            scaffold::main_entry(),
            "typescript",
            "Application entry point",
        ),
        GeneratedFile::new(
            "src/index.css",
            scaffold::global_stylesheet(),
            "css",
            "Global styles",
        ),
        GeneratedFile::new(
            "src/App.tsx",
            components::app_root(project, requirements),
            "typescript",
            "Main application component",
        ),
        GeneratedFile::new(
            "src/types.ts",
            scaffold::types_definition(),
            "typescript",
            "Shared type definitions",
        ),
        GeneratedFile::new(
            "src/hooks/useLocalStorage.ts",
            scaffold::persistence_hook(),
            "typescript",
            "Persistent client-side state hook",
        ),
    ];

    if crud_ui {
        files.push(GeneratedFile::new(
            "src/components/Header.tsx",
            components::header(),
            "typescript",
            "App header with dark-mode toggle",
        ));
        files.push(GeneratedFile::new(
            "src/components/ItemForm.tsx",
            components::item_form(),
            "typescript",
            "Data entry form",
        ));
        files.push(GeneratedFile::new(
            "src/components/ItemList.tsx",
            components::item_list(),
            "typescript",
            "Sorted item list",
        ));
        files.push(GeneratedFile::new(
            "src/components/ItemCard.tsx",
            components::item_card(),
            "typescript",
            "Single item card",
        ));
    }

    if requirements.has(Feature::ApiBackend) {
        files.push(GeneratedFile::new(
            "server/index.ts",
            scaffold::backend_entry(&project.name),
            "typescript",
            "API server entry point",
        ));
    }

    files.push(GeneratedFile::new(
        "README.md",
        readme(project, requirements),
        "markdown",
        "Project documentation",
    ));
    files.push(GeneratedFile::new(
        "Dockerfile",
        dockerfile(),
        "dockerfile",
        "Container configuration",
    ));
    files.push(GeneratedFile::new(
        ".gitignore",
        gitignore(),
        "text",
        "Git ignore rules",
    ));

    debug!(
        project_id = %project.id,
        file_count = files.len(),
        crud_ui,
        "File synthesis complete"
    );

    files
}

/// Kebab-case package name derived from the project name
fn slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn package_json(project: &ProjectDescriptor, architecture: &ArchitectureDescriptor) -> String {
    let dev_dependencies: serde_json::Map<String, serde_json::Value> = DEV_DEPENDENCIES
        .iter()
        .map(|(name, version)| ((*name).to_string(), json!(version)))
        .collect();

    let manifest = json!({
        "name": slug(&project.name),
        "version": "1.0.0",
        "description": project.description,
        "scripts": {
            "dev": "vite",
            "build": "vite build",
            "preview": "vite preview",
            "test": "vitest run"
        },
        "dependencies": architecture.dependencies,
        "devDependencies": dev_dependencies,
    });

    // to_string_pretty over serde_json's BTreeMap-backed objects keeps key
    // order stable across calls
    let mut out = serde_json::to_string_pretty(&manifest).expect("manifest serializes");
    out.push('\n');
    out
}

fn readme(project: &ProjectDescriptor, requirements: &RequirementsSet) -> String {
    let features = requirements
        .features
        .iter()
        .map(|f| format!("- {}", f.as_str()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# {name}\n\n\
         {description}\n\n\
         ## Features\n\n\
         {features}\n\n\
         ## Getting Started\n\n\
         ### Prerequisites\n\n\
         - Node.js 18+\n\
         - npm or yarn\n\n\
         ### Installation\n\n\
         ```bash\nnpm install\n```\n\n\
         ### Development\n\n\
         ```bash\nnpm run dev\n```\n\n\
         ### Build\n\n\
         ```bash\nnpm run build\n```\n\n\
         ### Test\n\n\
         ```bash\nnpm test\n```\n\n\
         ## Deployment\n\n\
         See `Dockerfile` for containerized deployment.\n",
        name = project.name,
        description = project.description,
        features = features,
    )
}

fn dockerfile() -> String {
    "FROM node:20-alpine\n\n\
     WORKDIR /app\n\n\
     COPY package*.json ./\n\
     RUN npm install\n\n\
     COPY . .\n\
     RUN npm run build\n\n\
     EXPOSE 3000\n\n\
     CMD [\"npm\", \"run\", \"preview\"]\n"
        .to_string()
}

fn gitignore() -> String {
    "node_modules\ndist\n.env\n.env.local\n*.log\n.DS_Store\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::architecture;
    use crate::requirements::extract;

    fn synth(description: &str) -> (ProjectDescriptor, Vec<GeneratedFile>) {
        let project = ProjectDescriptor::new("Demo App", description);
        let requirements = extract(description, &[]);
        let arch = architecture::synthesize(&project, &requirements);
        let files = generate(&project, &arch, &requirements);
        (project, files)
    }

    fn paths(files: &[GeneratedFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_idempotent_generation() {
        let project = ProjectDescriptor::new("Demo App", "a todo app with charts");
        let requirements = extract(&project.description, &[]);
        let arch = architecture::synthesize(&project, &requirements);

        let first = generate(&project, &arch, &requirements);
        let second = generate(&project, &arch, &requirements);
        assert_eq!(first, second);
    }

    #[test]
    fn test_always_emitted_files() {
        let (_, files) = synth("a plain site");
        let paths = paths(&files);

        for expected in [
            "package.json",
            "vite.config.ts",
            "tsconfig.json",
            "tailwind.config.js",
            "index.html",
            "src/main.tsx",
            "src/index.css",
            "src/App.tsx",
            "src/types.ts",
            "src/hooks/useLocalStorage.ts",
            "README.md",
            "Dockerfile",
            ".gitignore",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_unique_paths() {
        let (_, files) = synth("a todo app with an api backend and charts");
        let mut seen = std::collections::HashSet::new();
        for file in &files {
            assert!(seen.insert(&file.path), "duplicate path {}", file.path);
        }
    }

    #[test]
    fn test_crud_components_conditional() {
        let (_, files) = synth("a todo app with dark mode");
        let paths = paths(&files);
        assert!(paths.contains(&"src/components/Header.tsx"));
        assert!(paths.contains(&"src/components/ItemForm.tsx"));
        assert!(paths.contains(&"src/components/ItemList.tsx"));
        assert!(paths.contains(&"src/components/ItemCard.tsx"));

        // No crud/data-display: dashboard with charts only
        let (_, files) = synth("an analytics dashboard with charts");
        let paths = self::paths(&files);
        assert!(!paths.contains(&"src/components/ItemList.tsx"));
        assert!(!paths.contains(&"src/components/Header.tsx"));
    }

    #[test]
    fn test_backend_entry_conditional() {
        let (_, files) = synth("a todo app with dark mode");
        assert!(!paths(&files).contains(&"server/index.ts"));

        let (_, files) = synth("a todo app with an api backend");
        assert!(paths(&files).contains(&"server/index.ts"));
    }

    #[test]
    fn test_package_json_contents() {
        let (_, files) = synth("a kanban board with drag and drop");
        let manifest = files.iter().find(|f| f.path == "package.json").unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&manifest.content).unwrap();
        assert_eq!(parsed["name"], "demo-app");
        assert_eq!(parsed["scripts"]["build"], "vite build");
        assert!(parsed["dependencies"]["@dnd-kit/core"].is_string());
        assert!(parsed["devDependencies"]["vitest"].is_string());
    }

    #[test]
    fn test_readme_interpolation() {
        let (project, files) = synth("a recipe manager with search");
        let readme = files.iter().find(|f| f.path == "README.md").unwrap();

        assert!(readme.content.contains(&project.name));
        assert!(readme.content.contains(&project.description));
        assert!(readme.content.contains("- search-filter"));
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("My Demo App"), "my-demo-app");
        assert_eq!(slug("Single"), "single");
    }
}
