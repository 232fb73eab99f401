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

use axum::http::StatusCode;
use maud::Markup;
use maud::html;

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::shell::render_page;
use crate::slots::Slot;
use crate::slots::Slots;

/// Renders an error page for `status` inside the page shell.
pub fn render_error_page(
    ctx: &RenderContext,
    status: StatusCode,
    message: Option<&str>,
) -> Result<Markup, RenderError> {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown HTTP Error");
    let message = message.map(str::to_string);
    let slots = Slots::new()
        .with_markup(Slot::Title, html! { (code) " " (reason) })
        .with(Slot::Main, move |_| {
            html! {
                div.error {
                    h1 { (code) " : " (reason) }
                    @if let Some(message) = &message {
                        p { (message) }
                    }
                }
            }
        });
    render_page(ctx, &slots)
}
