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

//! The data object the page hands to client-side scripts as `window.jhdata`.

use serde::Serialize;

use crate::context::RenderContext;

#[derive(Serialize, Debug, PartialEq)]
pub struct ClientData<'a> {
    base_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
}

impl<'a> ClientData<'a> {
    pub fn from_context(ctx: &'a RenderContext) -> Self {
        Self {
            base_url: &ctx.base_url,
            user: ctx.current_user.as_ref().map(|u| u.name.as_str()),
        }
    }

    /// Serializes the object as a JavaScript literal that is safe to embed
    /// in a `<script>` element.
    pub fn to_script_literal(&self) -> String {
        // Serializing a struct of strings cannot fail.
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        escape_for_script(&json)
    }
}

/// Escapes the characters that could end a script element or open an HTML
/// comment. The result is still valid JSON.
pub fn escape_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}
