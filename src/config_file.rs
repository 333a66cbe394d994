//! Generic config file loader

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigBackend {
    Json5,
    Yaml,
    Ron,
}

impl ConfigBackend {
    pub fn from_str_with_path<T: DeserializeOwned>(self, s: &str, path: &Path) -> Result<T> {
        match self {
            ConfigBackend::Json5 => json5::from_str(s)
                .with_context(|| anyhow!("decoding JSON5 from config file {path:?}")),
            ConfigBackend::Yaml => serde_yml::from_str(s)
                .with_context(|| anyhow!("decoding YAML from config file {path:?}")),
            ConfigBackend::Ron => {
                ron::from_str(s).with_context(|| anyhow!("decoding RON from config file {path:?}"))
            }
        }
    }

    pub fn load_config_file<T: DeserializeOwned>(self, path: &Path) -> Result<T> {
        let s = std::fs::read_to_string(path)
            .with_context(|| anyhow!("loading config file from {path:?}"))?;
        self.from_str_with_path(&s, path)
    }
}

pub const FILE_EXTENSIONS: &[(&str, ConfigBackend)] = &[
    ("json5", ConfigBackend::Json5),
    ("json", ConfigBackend::Json5),
    ("yml", ConfigBackend::Yaml),
    ("yaml", ConfigBackend::Yaml),
    ("ron", ConfigBackend::Ron),
];

pub fn backend_from_path(path: &Path) -> Result<ConfigBackend> {
    if let Some(ext) = path.extension() {
        if let Some(ext) = ext.to_str() {
            if let Some((_, backend)) = FILE_EXTENSIONS.iter().find(|(e, _b)| *e == ext) {
                Ok(*backend)
            } else {
                bail!("given file path does have an unknown extension {ext:?}: {path:?}")
            }
        } else {
            bail!("given file path does have an extension that is not unicode: {path:?}")
        }
    } else {
        bail!(
            "given file path does not have an extension \
             for determining the file type: {path:?}"
        )
    }
}

/// Append `.{extension}` to the file name part of `path` (unlike
/// `Path::with_extension`, which replaces an existing one). None if
/// `path` has no file name.
pub fn add_extension(path: &Path, extension: &str) -> Option<PathBuf> {
    let mut file_name: OsString = path.file_name()?.to_owned();
    file_name.push(".");
    file_name.push(extension);
    Some(path.with_file_name(file_name))
}

pub trait LoadConfigFile: DeserializeOwned {
    /// All of the `FILE_EXTENSIONS` are tried with this path.
    fn default_config_path_without_suffix() -> Result<Option<PathBuf>>;

    /// If `path` is given, the file must exist or an error is
    /// returned. Otherwise, a default location is checked
    /// (`default_config_path_without_suffix`) and if a file with one
    /// of the fitting file name extensions exists, it is loaded,
    /// otherwise `or_else` is called with a message mentioning what
    /// was tried; it can issue an error or generate a default config
    /// value.
    fn load_config<P: AsRef<Path>>(
        path: Option<P>,
        or_else: impl FnOnce(String) -> Result<Self>,
    ) -> Result<Self> {
        if let Some(path) = path {
            let path = path.as_ref();
            let backend = backend_from_path(path)?;
            backend.load_config_file(path)
        } else {
            if let Some(path) = Self::default_config_path_without_suffix()? {
                let path_and_backends: Vec<(PathBuf, ConfigBackend)> = FILE_EXTENSIONS
                    .iter()
                    .map(|(extension, backend)| {
                        let path = add_extension(&path, extension)
                            .ok_or_else(|| anyhow!("path is missing a file name: {path:?}"))?;
                        if path.exists() {
                            Ok(Some((path, *backend)))
                        } else {
                            Ok(None)
                        }
                    })
                    .filter_map(|x| x.transpose())
                    .collect::<Result<_>>()?;
                match path_and_backends.as_slice() {
                    [] => or_else(format!(
                        "no file found at the default path {path:?} \
                         with any of the extensions {:?}",
                        FILE_EXTENSIONS.iter().map(|(e, _)| e).collect::<Vec<_>>()
                    )),
                    [(path, backend)] => backend.load_config_file(path),
                    _ => {
                        let paths: Vec<_> = path_and_backends.iter().map(|(p, _)| p).collect();
                        bail!("multiple config file paths found, leading to ambiguity: {paths:?}")
                    }
                }
            } else {
                or_else(
                    "no path was given and there is no default \
                     config location for this type"
                        .into(),
                )
            }
        }
    }
}
