use std::path::Path;

use tracing::debug;

/// Per-template cap on characters fed into the prompt.
const MAX_TEMPLATE_CHARS: usize = 2000;

/// An extracted past report used for style and format matching.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub content: String,
}

/// Load every `.txt` template from `dir`, sorted by name.
///
/// A missing directory means no templates, not an error: generation
/// works fine without style examples.
pub fn load_templates(dir: &Path) -> Vec<Template> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut templates: Vec<Template> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "txt"))
        .filter_map(|e| {
            let path = e.path();
            let name = path.file_stem()?.to_string_lossy().into_owned();
            let content = std::fs::read_to_string(&path).ok()?;
            Some(Template { name, content })
        })
        .collect();
    templates.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(count = templates.len(), dir = %dir.display(), "loaded report templates");
    templates
}

/// Delete the named template. `Ok(false)` when no such template
/// exists; names carrying path separators are rejected outright so a
/// caller-supplied name can only ever address files inside `dir`.
pub fn delete_template(dir: &Path, name: &str) -> std::io::Result<bool> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Ok(false);
    }
    match std::fs::remove_file(dir.join(format!("{name}.txt"))) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Render templates into the prompt's example section.
pub fn render_section(templates: &[Template]) -> String {
    templates
        .iter()
        .map(|t| {
            let truncated: String = t.content.chars().take(MAX_TEMPLATE_CHARS).collect();
            format!("--- Template: {} ---\n{}", t.name, truncated)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_yields_no_templates() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(load_templates(&missing).is_empty());
    }

    #[test]
    fn loads_only_txt_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b-weekly.txt"), "weekly body").unwrap();
        std::fs::write(dir.path().join("a-daily.txt"), "daily body").unwrap();
        std::fs::write(dir.path().join("ignore.pdf"), "binary").unwrap();

        let templates = load_templates(dir.path());
        let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a-daily", "b-weekly"]);
    }

    #[test]
    fn delete_removes_only_the_named_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("daily.txt"), "body").unwrap();
        std::fs::write(dir.path().join("weekly.txt"), "body").unwrap();

        assert!(delete_template(dir.path(), "daily").unwrap());
        let names: Vec<String> = load_templates(dir.path()).into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["weekly"]);
    }

    #[test]
    fn delete_missing_template_reports_false() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!delete_template(dir.path(), "ghost").unwrap());
    }

    #[test]
    fn delete_rejects_path_escapes() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("secret.txt");
        std::fs::write(&outside, "keep me").unwrap();

        let templates = dir.path().join("templates");
        std::fs::create_dir(&templates).unwrap();
        assert!(!delete_template(&templates, "../secret").unwrap());
        assert!(!delete_template(&templates, "").unwrap());
        assert!(outside.exists());
    }

    #[test]
    fn render_truncates_long_templates() {
        let long = Template {
            name: "big".to_string(),
            content: "x".repeat(5000),
        };
        let section = render_section(&[long]);
        assert!(section.len() < 2100);
        assert!(section.starts_with("--- Template: big ---"));
    }
}
