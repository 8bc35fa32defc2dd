use std::fs;
use std::path::Path;

use super::TemplateCommands;
use crate::display::display_templates;
use crate::error::{ForcesError, Result};
use crate::models::config::ConfigPaths;
use crate::models::{Language, Template, TemplateRegistry};

pub fn handle_template(command: TemplateCommands) -> Result<()> {
    let paths = ConfigPaths::resolve()?;
    let mut registry = TemplateRegistry::load_or_init(&paths)?;

    match command {
        TemplateCommands::List => {
            println!("Templates in {} (* = starter):", paths.root().display());
            display_templates(&registry);
            return Ok(());
        }
        TemplateCommands::Add {
            name,
            path,
            lang,
            run,
            build,
        } => {
            let template = template_from_args(name, Path::new(&path), lang, run, build)?;
            let summary = format!("'{}' ({})", template.name, template.source_path.display());
            registry.add(template)?;
            println!("Added template {}", summary);
        }
        TemplateCommands::Remove { name } => {
            registry.remove(&name)?;
            println!("Removed template '{}'", name);
        }
        TemplateCommands::Starter { name } => {
            registry.set_starter(&name)?;
            println!("Starter template is now '{}'", name);
        }
    }

    registry.save(&paths)
}

/// Missing commands are filled in from the language, which is taken from
/// `--lang` or guessed from the file extension.
fn template_from_args(
    name: String,
    path: &Path,
    lang: Option<Language>,
    run: Option<String>,
    build: Option<String>,
) -> Result<Template> {
    let source_path = fs::canonicalize(path).map_err(|e| ForcesError::file(path, e))?;
    let extension = source_path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| {
            ForcesError::Template(format!("{} has no file extension", source_path.display()))
        })?
        .to_string();
    let language = lang.or_else(|| Language::from_extension(&extension));

    let run_command = match (run, language) {
        (Some(run), _) => run,
        (None, Some(language)) => language.run_command().to_string(),
        (None, None) => {
            return Err(ForcesError::Template(format!(
                "no default run command for .{} files; pass --run",
                extension
            )))
        }
    };
    let build_command = build.or_else(|| language.and_then(|l| l.build_command()).map(str::to_string));

    Ok(Template {
        name,
        source_path,
        file_extension: format!(".{}", extension),
        run_command,
        build_command,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fast.cpp");
        fs::write(&path, "int main() {}\n").unwrap();

        let template = template_from_args("fast".to_string(), &path, None, None, None).unwrap();
        assert_eq!(template.file_extension, ".cpp");
        assert_eq!(template.run_command, "{bin}");
        assert_eq!(
            template.build_command.as_deref(),
            Some("g++ -std=c++17 -O2 -o {bin} {src}")
        );
        assert!(template.source_path.is_absolute());
    }

    #[test]
    fn test_explicit_commands_win() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("main.py");
        fs::write(&path, "").unwrap();

        let template = template_from_args(
            "pypy".to_string(),
            &path,
            None,
            Some("pypy3 {src}".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(template.run_command, "pypy3 {src}");
        assert_eq!(template.build_command, None);
    }

    #[test]
    fn test_unknown_extension_needs_run() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("main.hs");
        fs::write(&path, "").unwrap();

        let err = template_from_args("hs".to_string(), &path, None, None, None).unwrap_err();
        assert!(matches!(err, ForcesError::Template(_)));
    }

    #[test]
    fn test_missing_source_is_error() {
        let temp = TempDir::new().unwrap();
        let err = template_from_args("x".to_string(), &temp.path().join("nope.cpp"), None, None, None)
            .unwrap_err();
        assert!(matches!(err, ForcesError::File { .. }));
    }
}
