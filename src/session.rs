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

use axum::http::HeaderMap;
use axum::http::HeaderName;

use crate::context::CurrentUser;
use crate::error::ErrorReport;
use crate::error::Fallible;

/// Determines who a request belongs to. Authentication happens elsewhere:
/// either a proxy in front of the server sets a trusted header, or the
/// server runs with a fixed user.
pub struct SessionLookup {
    user_header: Option<HeaderName>,
    fixed_user: Option<String>,
}

impl SessionLookup {
    pub fn new(user_header: Option<&str>, fixed_user: Option<&str>) -> Fallible<Self> {
        let user_header = match user_header {
            Some(name) => Some(
                HeaderName::try_from(name)
                    .map_err(|_| ErrorReport::new("invalid user header name"))?,
            ),
            None => None,
        };
        Ok(Self {
            user_header,
            fixed_user: fixed_user.map(str::to_string),
        })
    }

    pub fn anonymous() -> Self {
        Self {
            user_header: None,
            fixed_user: None,
        }
    }

    pub fn current_user(&self, headers: &HeaderMap) -> Option<CurrentUser> {
        if let Some(header) = &self.user_header {
            let name = headers
                .get(header)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|name| !name.is_empty());
            if let Some(name) = name {
                return Some(CurrentUser::new(name));
            }
        }
        self.fixed_user.as_deref().map(CurrentUser::new)
    }
}
