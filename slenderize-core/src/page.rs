//! Hosting renderer: view files in, rendered documents out.
//!
//! A [`Page`] maps a view name to `view_dir/<name>`, keeps its compiled
//! form at `cache_dir/<name>.html`, and renders that artifact against its
//! bindings. The artifact is rebuilt only when its modification time no
//! longer matches the view's.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::compiler::compile_file;
use crate::error::ParseError;
use crate::runtime::{render, Bindings, RenderError, StaticRegistry};

/// Where views are read from and compiled artifacts are written to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub view_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            view_dir: PathBuf::from("views"),
            cache_dir: PathBuf::from("cache"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid view name `{0}`")]
    InvalidViewName(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to compile {}: {source}", .path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl PageError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> PageError + '_ {
        move |source| PageError::Io { path: path.to_path_buf(), source }
    }
}

/// Strip everything but `[A-Za-z0-9_.-]` from a view name.
///
/// Path separators never survive, so a sanitized name always stays inside
/// its directory. Names left empty or made only of dots are rejected.
pub fn sanitize_view_name(name: &str) -> Result<String, PageError> {
    let clean: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    if clean.is_empty() || clean.bytes().all(|b| b == b'.') {
        return Err(PageError::InvalidViewName(name.to_string()));
    }
    Ok(clean)
}

#[derive(Debug)]
pub struct Page {
    view_name: String,
    bindings: Bindings,
    statics: StaticRegistry,
    config: PageConfig,
}

impl Page {
    pub fn new(view_name: impl Into<String>, bindings: Bindings, config: PageConfig) -> Self {
        Self {
            view_name: view_name.into(),
            bindings,
            statics: StaticRegistry::new(),
            config,
        }
    }

    pub fn with_statics(mut self, statics: StaticRegistry) -> Self {
        self.statics = statics;
        self
    }

    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    pub fn view_dir(&self) -> &Path {
        &self.config.view_dir
    }

    pub fn set_view_dir(&mut self, dir: impl Into<PathBuf>) {
        self.config.view_dir = dir.into();
    }

    pub fn cache_dir(&self) -> &Path {
        &self.config.cache_dir
    }

    pub fn set_cache_dir(&mut self, dir: impl Into<PathBuf>) {
        self.config.cache_dir = dir.into();
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    /// Make sure the cached artifact for `name` is current and return its path.
    pub fn compile(&self, name: &str) -> Result<PathBuf, PageError> {
        let name = sanitize_view_name(name)?;
        let view_path = self.config.view_dir.join(&name);
        let cache_path = self.config.cache_dir.join(format!("{name}.html"));

        let view_mtime = fs::metadata(&view_path)
            .and_then(|meta| meta.modified())
            .map_err(PageError::io(&view_path))?;

        if cached_mtime(&cache_path) == Some(view_mtime) {
            debug!(view = %name, "cache hit");
            return Ok(cache_path);
        }

        info!(view = %name, cache = %cache_path.display(), "compiling view");
        let output = compile_file(&view_path).map_err(|source| PageError::Compile {
            path: view_path.clone(),
            source,
        })?;

        fs::create_dir_all(&self.config.cache_dir)
            .map_err(PageError::io(&self.config.cache_dir))?;
        fs::write(&cache_path, output.compose()).map_err(PageError::io(&cache_path))?;
        File::options()
            .write(true)
            .open(&cache_path)
            .and_then(|file| file.set_modified(view_mtime))
            .map_err(PageError::io(&cache_path))?;

        Ok(cache_path)
    }

    /// Compile `name` if needed, then render it with this page's bindings.
    pub fn view(&self, name: &str) -> Result<String, PageError> {
        let cache_path = self.compile(name)?;
        let compiled = fs::read_to_string(&cache_path).map_err(PageError::io(&cache_path))?;
        Ok(render(&compiled, &self.bindings, &self.statics)?)
    }

    /// Render the view this page was created for.
    pub fn output(&self) -> Result<String, PageError> {
        self.view(&self.view_name)
    }
}

fn cached_mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
