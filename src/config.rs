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

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::assets::StaticAssets;
use crate::error::Fallible;
use crate::error::fail;
use crate::url::normalize_hub_prefix;
use crate::url::url_path_join;

/// Server configuration, read from a TOML file. Every field has a default.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The base URL of the entire application.
    pub base_url: String,
    /// The prefix the hub pages are served under. Defaults to
    /// `{base_url}hub/`.
    pub hub_prefix: Option<String>,
    /// Address the server listens on.
    pub bind: String,
    /// Directory of static assets served under `{hub_prefix}static/`.
    pub static_dir: Option<PathBuf>,
    /// A user every request is considered logged in as. For previews.
    pub user: Option<String>,
    /// A request header carrying the user name, set by an authenticating
    /// proxy in front of the server. Takes precedence over `user`.
    pub user_header: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "/".to_string(),
            hub_prefix: None,
            bind: "127.0.0.1:8081".to_string(),
            static_dir: None,
            user: None,
            user_header: None,
        }
    }
}

impl Config {
    /// Loads the config file at `path`, or the defaults if there is none.
    pub fn load(path: Option<&Path>) -> Fallible<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return fail("config file does not exist.");
                }
                log::debug!("Loading config from {}", path.display());
                let content = read_to_string(path)?;
                Self::parse(&content)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        if !config.base_url.starts_with('/') {
            return fail("base_url must start with '/'.");
        }
        if !config.base_url.ends_with('/') {
            return fail("base_url must end with '/'.");
        }
        // Surface prefix errors at load time rather than on first request.
        config.hub_prefix()?;
        Ok(config)
    }

    pub fn hub_prefix(&self) -> Fallible<String> {
        match &self.hub_prefix {
            Some(prefix) => normalize_hub_prefix(&self.base_url, prefix),
            None => Ok(url_path_join(&[&self.base_url, "/hub/"])),
        }
    }

    /// Builds the asset index for the static directory.
    pub fn assets(&self) -> Fallible<StaticAssets> {
        let prefix = url_path_join(&[&self.hub_prefix()?, "static/"]);
        match &self.static_dir {
            Some(dir) => StaticAssets::from_directory(&prefix, dir),
            None => Ok(StaticAssets::unversioned(&prefix)),
        }
    }
}
