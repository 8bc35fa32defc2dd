use std::fs;
use std::path::PathBuf;

use log::info;
use serde::{Deserialize, Serialize};

use super::config::{read_json, write_json, ConfigPaths};
use super::language::Language;
use crate::error::{ForcesError, Result};

pub const DEFAULT_TEMPLATE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub source_path: PathBuf,
    /// Includes the leading dot, e.g. `.cpp`.
    pub file_extension: String,
    pub run_command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
}

impl Template {
    pub fn for_language(name: impl Into<String>, source_path: PathBuf, language: Language) -> Self {
        Self {
            name: name.into(),
            source_path,
            file_extension: format!(".{}", language.extension()),
            run_command: language.run_command().to_string(),
            build_command: language.build_command().map(str::to_string),
        }
    }

    pub fn language(&self) -> Option<Language> {
        Language::from_extension(&self.file_extension)
    }

    pub fn comment_prefix(&self) -> &'static str {
        self.language().map_or("//", |lang| lang.comment_prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRegistry {
    pub starter_name: String,
    pub templates: Vec<Template>,
}

/// Outcome of reading `templates.json`. Read and parse failures are errors,
/// never `Absent`.
#[derive(Debug)]
pub enum RegistryFile {
    Found(TemplateRegistry),
    Absent,
}

impl TemplateRegistry {
    pub fn read(paths: &ConfigPaths) -> Result<RegistryFile> {
        Ok(match read_json(&paths.templates())? {
            Some(registry) => RegistryFile::Found(registry),
            None => RegistryFile::Absent,
        })
    }

    pub fn load_or_init(paths: &ConfigPaths) -> Result<Self> {
        match Self::read(paths)? {
            RegistryFile::Found(registry) => Ok(registry),
            RegistryFile::Absent => Self::bootstrap(paths),
        }
    }

    fn bootstrap(paths: &ConfigPaths) -> Result<Self> {
        paths.ensure_dir()?;

        let language = Language::Cpp;
        let source = paths.join(&format!("{}.{}", DEFAULT_TEMPLATE, language.extension()));
        if !source.exists() {
            fs::write(&source, language.starter_source())
                .map_err(|e| ForcesError::file(&source, e))?;
        }

        let registry = TemplateRegistry {
            starter_name: DEFAULT_TEMPLATE.to_string(),
            templates: vec![Template::for_language(DEFAULT_TEMPLATE, source, language)],
        };
        registry.save(paths)?;
        info!("created default template registry at {}", paths.templates().display());
        Ok(registry)
    }

    pub fn save(&self, paths: &ConfigPaths) -> Result<()> {
        write_json(paths, &paths.templates(), self)
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn starter(&self) -> Option<&Template> {
        self.get(&self.starter_name)
    }

    /// The named template, or the starter when no name is given.
    pub fn resolve(&self, name: Option<&str>) -> Result<&Template> {
        match name {
            Some(name) => self
                .get(name)
                .ok_or_else(|| ForcesError::NotFound(format!("template '{}'", name))),
            None => self.starter().ok_or_else(|| {
                ForcesError::NotFound(format!("starter template '{}'", self.starter_name))
            }),
        }
    }

    pub fn add(&mut self, template: Template) -> Result<()> {
        if self.get(&template.name).is_some() {
            return Err(ForcesError::Template(format!(
                "a template named '{}' already exists",
                template.name
            )));
        }
        self.templates.push(template);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Template> {
        if name == self.starter_name {
            return Err(ForcesError::Template(format!(
                "'{}' is the starter template; choose another starter first",
                name
            )));
        }
        let index = self
            .templates
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| ForcesError::NotFound(format!("template '{}'", name)))?;
        Ok(self.templates.remove(index))
    }

    pub fn set_starter(&mut self, name: &str) -> Result<()> {
        if self.get(name).is_none() {
            return Err(ForcesError::NotFound(format!("template '{}'", name)));
        }
        self.starter_name = name.to_string();
        Ok(())
    }
}
