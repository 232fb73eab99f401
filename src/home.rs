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

use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::modal::ModalSpec;
use crate::modal::anchor_key;
use crate::modal::build_modal;
use crate::shell::render_page;
use crate::slots::Slot;
use crate::slots::Slots;
use crate::url::encode_segment;

const STOP_SERVER: &str = "Stop My Server";

/// The hub's landing page.
pub fn render_home(ctx: &RenderContext) -> Result<Markup, RenderError> {
    let slots = match &ctx.current_user {
        Some(user) => {
            let server_url = ctx.link(&format!("user/{}", encode_segment(&user.name)));
            let modal = build_modal(
                &ModalSpec::new(
                    STOP_SERVER,
                    html! { p { "This will stop your notebook server. Unsaved work will be lost." } },
                )
                .button_label("Stop")
                .button_class("btn-danger"),
            )?;
            let target = format!("#{}-dialog", anchor_key(STOP_SERVER));
            let name = user.name.clone();
            Slots::new()
                .with(Slot::Main, move |_| {
                    html! {
                        div.container {
                            h1 { "Welcome, " (name) }
                            div.row {
                                a #start .btn .btn-lg .btn-success href=(server_url) { "My Server" }
                                " "
                                button #stop .btn .btn-lg .btn-danger type="button" data-toggle="modal" data-target=(target) {
                                    (STOP_SERVER)
                                }
                            }
                        }
                        (modal)
                    }
                })
                .with_markup(
                    Slot::Script,
                    html! {
                        script type="text/javascript" {
                            (PreEscaped(r#"require(["jquery", "bootstrap"]);"#))
                        }
                    },
                )
        }
        None => Slots::new().with(Slot::Main, |ctx| {
            html! {
                div.container {
                    p {
                        "You are not logged in. "
                        a href=(ctx.link("login")) { "Log in" }
                        " to use your notebook server."
                    }
                }
            }
        }),
    };
    render_page(ctx, &slots)
}

/// The page a user lands on when following the link to their own server.
/// Starting servers is the spawner's job, so this only reports that none is
/// running here.
pub fn render_user_server(ctx: &RenderContext, name: &str) -> Result<Markup, RenderError> {
    let name = name.to_string();
    let slots = Slots::new()
        .with_markup(Slot::Title, html! { "JupyterHub - " (name) })
        .with(Slot::Main, move |ctx| {
            html! {
                div.container {
                    h1 { (name) }
                    p { "No notebook server is running for this user." }
                    a #home .btn .btn-default href=(ctx.base_url) { "Back to the hub" }
                }
            }
        });
    render_page(ctx, &slots)
}
