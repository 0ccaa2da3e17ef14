//! Static file serving module
//!
//! Maps a request path onto the served root, guards against traversal, resolves
//! directories to their index document and streams the file.

use std::ffi::OsStr;
use std::io;
use std::path::{Component, Path, PathBuf};

use hyper::{Response, Uri};
use tokio::fs::{self, File};

use super::body::FileBody;
use super::error::ServeError;
use crate::http::{self, mime, ServeBody};
use crate::logger;

/// Document served for directory requests
pub const INDEX_FILE: &str = "index.html";

/// The directory boundary all served files must resolve within
#[derive(Debug, Clone)]
pub struct SiteRoot {
    root: PathBuf,
    read_buffer_size: usize,
}

impl SiteRoot {
    /// Make `root` absolute (relative to the working directory) and normalize it.
    ///
    /// The directory does not need to exist; requests will simply 404.
    pub fn new(root: impl AsRef<Path>, read_buffer_size: usize) -> io::Result<Self> {
        let absolute = std::path::absolute(root)?;
        Ok(Self {
            root: normalize(&absolute),
            read_buffer_size: read_buffer_size.max(1),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub const fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    /// Traversal guard: literal prefix check on the normalized path.
    ///
    /// Symlinks are not resolved, and a sibling directory whose name starts
    /// with the root's name also passes.
    pub fn contains(&self, candidate: &Path) -> bool {
        candidate
            .as_os_str()
            .as_encoded_bytes()
            .starts_with(self.root.as_os_str().as_encoded_bytes())
    }
}

/// Lexically resolve `.` and `..`; `..` never climbs above the filesystem root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
        }
    }
    out
}

/// Join a decoded request path onto `root` and normalize the result
pub fn resolve_candidate(root: &Path, decoded: &str) -> PathBuf {
    normalize(&root.join(decoded.trim_start_matches('/')))
}

pub fn content_type_for(path: &Path) -> &'static str {
    mime::get_content_type(path.extension().and_then(OsStr::to_str))
}

/// Serve one request target from `site`
pub async fn serve(site: &SiteRoot, uri: &Uri) -> Response<ServeBody> {
    match open(site, uri).await {
        Ok(resp) => resp,
        Err(e) => {
            match &e {
                ServeError::AccessDenied(_) => logger::log_warning(&format!(
                    "Path traversal attempt blocked: {uri} -> {e}"
                )),
                ServeError::ReadFailure { .. } => logger::log_error(&e.to_string()),
                // Not found is common, no need to log at warning level
                ServeError::MalformedPath(_) | ServeError::NotFound { .. } => {
                    logger::log_debug(&format!("{uri}: {e}"));
                }
            }
            e.into_response()
        }
    }
}

async fn open(site: &SiteRoot, uri: &Uri) -> Result<Response<ServeBody>, ServeError> {
    let decoded = http::decode_path(uri)?;
    let mut candidate = resolve_candidate(site.path(), &decoded);

    if !site.contains(&candidate) {
        return Err(ServeError::AccessDenied(candidate));
    }

    // A failed stat is not final; the access check below decides.
    if let Ok(meta) = fs::metadata(&candidate).await {
        if meta.is_dir() {
            candidate.push(INDEX_FILE);
        }
    }

    let content_type = content_type_for(&candidate);

    if let Err(source) = fs::metadata(&candidate).await {
        return Err(ServeError::NotFound {
            path: candidate,
            source,
        });
    }

    let file = match File::open(&candidate).await {
        Ok(file) => file,
        Err(source) => {
            return Err(ServeError::NotFound {
                path: candidate,
                source,
            })
        }
    };

    let mut body = FileBody::new(file, candidate.clone(), site.read_buffer_size());
    if let Err(source) = body.prime().await {
        return Err(ServeError::ReadFailure {
            path: candidate,
            content_type,
            source,
        });
    }

    Ok(http::build_file_response(content_type, body))
}
