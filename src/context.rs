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

use std::sync::Arc;

use crate::assets::AssetResolver;
use crate::error::RenderError;
use crate::url::url_path_join;

/// The authenticated user of the current request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub name: String,
}

impl CurrentUser {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Everything a page render needs. Built per request and discarded after the
/// render.
#[derive(Clone, Default)]
pub struct RenderContext {
    /// Path prefix for every generated link. Required.
    pub base_url: String,
    /// Present iff the request is authenticated.
    pub current_user: Option<CurrentUser>,
    /// Required.
    pub assets: Option<Arc<dyn AssetResolver>>,
}

impl RenderContext {
    pub fn new(base_url: &str, assets: Arc<dyn AssetResolver>) -> Self {
        Self {
            base_url: base_url.to_string(),
            current_user: None,
            assets: Some(assets),
        }
    }

    pub fn with_user(mut self, user: Option<CurrentUser>) -> Self {
        self.current_user = user;
        self
    }

    /// Checks the required fields.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.base_url.is_empty() {
            return Err(RenderError::MissingRequiredField("base_url"));
        }
        if self.assets.is_none() {
            return Err(RenderError::MissingRequiredField("assets"));
        }
        Ok(())
    }

    /// Resolves an asset URL. A context without a resolver yields the bare
    /// path; `validate` rejects such contexts before anything is rendered.
    pub fn static_url(&self, path: &str, include_version: bool) -> String {
        match &self.assets {
            Some(assets) => assets.resolve(path, include_version),
            None => path.to_string(),
        }
    }

    /// A link under `base_url`.
    pub fn link(&self, path: &str) -> String {
        url_path_join(&[&self.base_url, path])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::StaticAssets;

    #[test]
    fn test_validate_ok() {
        let ctx = RenderContext::new("/hub/", Arc::new(StaticAssets::unversioned("/hub/static/")));
        assert_eq!(ctx.validate(), Ok(()));
    }

    #[test]
    fn test_validate_missing_base_url() {
        let ctx = RenderContext {
            assets: Some(Arc::new(StaticAssets::unversioned("/static/"))),
            ..RenderContext::default()
        };
        assert_eq!(
            ctx.validate(),
            Err(RenderError::MissingRequiredField("base_url"))
        );
    }

    #[test]
    fn test_validate_missing_assets() {
        let ctx = RenderContext {
            base_url: "/hub/".to_string(),
            ..RenderContext::default()
        };
        assert_eq!(ctx.validate(), Err(RenderError::MissingRequiredField("assets")));
    }

    #[test]
    fn test_link() {
        let ctx = RenderContext::new("/hub/", Arc::new(StaticAssets::unversioned("/hub/static/")));
        assert_eq!(ctx.link("logout"), "/hub/logout");
        let ctx = RenderContext::new("/hub", Arc::new(StaticAssets::unversioned("/hub/static/")));
        assert_eq!(ctx.link("login"), "/hub/login");
    }
}
