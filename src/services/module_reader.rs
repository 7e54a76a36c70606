use crate::domain::models::{IdentityError, Module, ModuleFile, ModuleIdentity, ModuleReference};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MODULE_CONFIG_FILE: &str = "buf.yaml";
const LOCK_FILE: &str = "buf.lock";
const DOCUMENTATION_FILE: &str = "README.md";
const LICENSE_FILE: &str = "LICENSE";

#[derive(thiserror::Error, Debug)]
pub enum ModuleError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("module name not set in {}", .0.display())]
    MissingName(PathBuf),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("module at {} contains no .proto files", .0.display())]
    Empty(PathBuf),
}

/// Turns an input locator into module content plus the identity to push it under.
pub trait ModuleSource {
    fn read(&self, locator: &str) -> Result<(Module, ModuleIdentity), ModuleError>;
}

/// Reads a module from a local directory holding a `buf.yaml`.
pub struct DirModuleSource;

impl ModuleSource for DirModuleSource {
    fn read(&self, locator: &str) -> Result<(Module, ModuleIdentity), ModuleError> {
        read_module_dir(Path::new(locator))
    }
}

#[derive(Debug, Deserialize, Default)]
struct ModuleConfig {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    deps: Vec<String>,
    #[serde(default)]
    build: BuildConfig,
}

#[derive(Debug, Deserialize, Default)]
struct BuildConfig {
    #[serde(default)]
    excludes: Vec<String>,
}

pub fn read_module_dir(root: &Path) -> Result<(Module, ModuleIdentity), ModuleError> {
    let config_path = root.join(MODULE_CONFIG_FILE);
    let raw_config = read_file(&config_path)?;
    let config: ModuleConfig =
        serde_yaml::from_slice(&raw_config).map_err(|source| ModuleError::Config {
            path: config_path.clone(),
            source,
        })?;

    let name = config
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ModuleError::MissingName(config_path.clone()))?;
    let identity = ModuleIdentity::parse(&name)?;
    let dependencies = config
        .deps
        .iter()
        .map(|d| ModuleReference::parse(d))
        .collect::<Result<Vec<_>, _>>()?;

    let excludes: Vec<PathBuf> = config
        .build
        .excludes
        .iter()
        .map(|e| root.join(e.trim_end_matches('/')))
        .collect();

    let mut files = Vec::new();
    collect_protos(root, root, &excludes, &mut files)?;
    if files.is_empty() {
        return Err(ModuleError::Empty(root.to_path_buf()));
    }
    debug!(count = files.len(), root = %root.display(), "collected proto files");

    files.push(ModuleFile {
        path: MODULE_CONFIG_FILE.to_string(),
        content: raw_config,
    });
    if let Some(lock) = read_optional(&root.join(LOCK_FILE))? {
        files.push(ModuleFile {
            path: LOCK_FILE.to_string(),
            content: lock,
        });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let documentation = read_optional(&root.join(DOCUMENTATION_FILE))?
        .map(|b| String::from_utf8_lossy(&b).into_owned());
    let license =
        read_optional(&root.join(LICENSE_FILE))?.map(|b| String::from_utf8_lossy(&b).into_owned());

    Ok((
        Module {
            files,
            dependencies,
            documentation,
            license,
        },
        identity,
    ))
}

fn collect_protos(
    root: &Path,
    dir: &Path,
    excludes: &[PathBuf],
    out: &mut Vec<ModuleFile>,
) -> Result<(), ModuleError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ModuleError::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| ModuleError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let ty = entry.file_type().map_err(|source| ModuleError::Read {
            path: path.clone(),
            source,
        })?;
        if ty.is_dir() {
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if hidden || excludes.iter().any(|x| x == &path) {
                continue;
            }
            collect_protos(root, &path, excludes, out)?;
        } else if ty.is_file() && path.extension().is_some_and(|ext| ext == "proto") {
            out.push(ModuleFile {
                path: relative_path(root, &path),
                content: read_file(&path)?,
            });
        }
    }
    Ok(())
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn read_file(path: &Path) -> Result<Vec<u8>, ModuleError> {
    std::fs::read(path).map_err(|source| ModuleError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, ModuleError> {
    if !path.exists() {
        return Ok(None);
    }
    read_file(path).map(Some)
}
