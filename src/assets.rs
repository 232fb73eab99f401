// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::url::url_path_join;

/// Number of hex digits of the content hash used as the version string.
const VERSION_LENGTH: usize = 12;

/// Maps a logical asset path (e.g. `images/favicon.ico`) to a URL the browser
/// can fetch. Implementations must be pure: the same input always yields the
/// same URL, and resolving performs no I/O.
pub trait AssetResolver: Send + Sync {
    fn resolve(&self, path: &str, include_version: bool) -> String;
}

/// Serves assets from a URL prefix, versioning them by the blake3 hash of
/// their contents.
///
/// Hashes are computed once, when the index is built, so that `resolve` is an
/// in-memory lookup.
pub struct StaticAssets {
    /// The URL prefix assets are served under, e.g. `/hub/static/`.
    url_prefix: String,
    /// The directory the assets were indexed from, if any.
    directory: Option<PathBuf>,
    /// Map of relative asset paths to their version strings.
    versions: HashMap<String, String>,
}

impl StaticAssets {
    /// An index with no files: URLs are built from the prefix alone and
    /// never carry a version.
    pub fn unversioned(url_prefix: &str) -> Self {
        Self {
            url_prefix: url_prefix.to_string(),
            directory: None,
            versions: HashMap::new(),
        }
    }

    /// Indexes every file under `directory`.
    pub fn from_directory(url_prefix: &str, directory: &Path) -> Fallible<Self> {
        if !directory.is_dir() {
            return fail("static directory does not exist.");
        }
        let directory = directory.canonicalize()?;
        let mut versions = HashMap::new();
        for entry in WalkDir::new(&directory) {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = path
                .strip_prefix(&directory)
                .map_err(|_| ErrorReport::new("invalid path"))?;
            let relative: String = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let bytes = std::fs::read(path)?;
            let hash = blake3::hash(&bytes).to_hex();
            versions.insert(relative, hash[..VERSION_LENGTH].to_string());
        }
        log::debug!("Indexed {} static files.", versions.len());
        Ok(Self {
            url_prefix: url_prefix.to_string(),
            directory: Some(directory),
            versions,
        })
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// The version string of an indexed asset.
    pub fn version(&self, path: &str) -> Option<&str> {
        self.versions
            .get(path.trim_start_matches('/'))
            .map(String::as_str)
    }
}

impl AssetResolver for StaticAssets {
    fn resolve(&self, path: &str, include_version: bool) -> String {
        let url = url_path_join(&[&self.url_prefix, path]);
        if include_version {
            if let Some(version) = self.version(path) {
                return format!("{url}?v={version}");
            }
        }
        url
    }
}
