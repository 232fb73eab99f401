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

use maud::DOCTYPE;
use maud::Markup;
use maud::PreEscaped;
use maud::html;
use serde_json::json;

use crate::client_data::ClientData;
use crate::client_data::escape_for_script;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::slots::Slot;
use crate::slots::Slots;

pub const DEFAULT_TITLE: &str = "JupyterHub";

/// Renders the full page shell, filling each slot with its override or its
/// default fragment.
pub fn render_page(ctx: &RenderContext, slots: &Slots) -> Result<Markup, RenderError> {
    ctx.validate()?;
    let jhdata = ClientData::from_context(ctx).to_script_literal();
    Ok(html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (slots.render(Slot::Title, ctx, |_| html! { (DEFAULT_TITLE) })) }
                meta http-equiv="X-UA-Compatible" content="chrome=1";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                link rel="shortcut icon" type="image/x-icon" href=(ctx.static_url("images/favicon.ico", true));
                (slots.render(Slot::Stylesheet, ctx, default_stylesheet))
                script src=(ctx.static_url("components/requirejs/require.js", true)) type="text/javascript" charset="utf-8" {}
                script type="text/javascript" {
                    (PreEscaped(format!("require.config({});", require_config(ctx))))
                }
                script type="text/javascript" {
                    (PreEscaped(format!("window.jhdata = {jhdata};")))
                }
                (slots.render(Slot::Meta, ctx, |_| html! {}))
            }
            body {
                noscript {
                    div #noscript {
                        "JupyterHub requires JavaScript."
                        br;
                        "Please enable it to proceed."
                    }
                }
                div #header .navbar .navbar-static-top {
                    div.container {
                        span #jupyterhub-logo .pull-left {
                            a href=(ctx.base_url) {
                                img.jpy-logo src=(ctx.static_url("images/jupyterhub-80.png", true)) alt="JupyterHub logo" title="Home";
                            }
                        }
                        (slots.render(Slot::LoginWidget, ctx, default_login_widget))
                        (slots.render(Slot::Header, ctx, |_| html! {}))
                    }
                }
                (slots.render(Slot::Main, ctx, |_| html! {}))
                (slots.render(Slot::Script, ctx, |_| html! {}))
            }
        }
    })
}

fn default_stylesheet(ctx: &RenderContext) -> Markup {
    html! {
        link rel="stylesheet" href=(ctx.static_url("css/style.min.css", true)) type="text/css";
    }
}

fn default_login_widget(ctx: &RenderContext) -> Markup {
    html! {
        span #login_widget {
            @if ctx.current_user.is_some() {
                a #logout .btn .navbar-btn .btn-default .pull-right href=(ctx.link("logout")) { "Logout" }
            } @else {
                a #login .btn .navbar-btn .btn-default .pull-right href=(ctx.link("login")) { "Login" }
            }
        }
    }
}

/// The script loader configuration. Module paths are relative to the
/// unversioned `js` directory.
fn require_config(ctx: &RenderContext) -> String {
    let config = json!({
        "baseUrl": ctx.static_url("js", false),
        "paths": {
            "jquery": "../components/jquery/jquery.min",
            "bootstrap": "../components/bootstrap/js/bootstrap.min",
            "moment": "../components/moment/moment",
        },
        "shim": {
            "bootstrap": {
                "deps": ["jquery"],
                "exports": "bootstrap",
            },
        },
    });
    escape_for_script(&config.to_string())
}
