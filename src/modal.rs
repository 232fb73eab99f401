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
use maud::html;

use crate::error::RenderError;

pub const DEFAULT_BUTTON_CLASS: &str = "btn-primary";

/// Describes one dialog.
///
/// The dialog is shown and hidden by client-side code, which finds it by the
/// id `{key}-dialog`, where `key` is the title's anchor key. Titles must be
/// unique within a page.
#[derive(Clone)]
pub struct ModalSpec {
    pub title: String,
    /// Label of the confirm button. Defaults to the title.
    pub button_label: Option<String>,
    /// Style class of the confirm button. Defaults to `btn-primary`.
    pub button_class: Option<String>,
    /// Inner markup of the dialog. Inserted as is: the caller is responsible
    /// for escaping untrusted content.
    pub body: Markup,
}

impl ModalSpec {
    pub fn new(title: &str, body: Markup) -> Self {
        Self {
            title: title.to_string(),
            button_label: None,
            button_class: None,
            body,
        }
    }

    pub fn button_label(mut self, label: &str) -> Self {
        self.button_label = Some(label.to_string());
        self
    }

    pub fn button_class(mut self, class: &str) -> Self {
        self.button_class = Some(class.to_string());
        self
    }
}

/// The DOM key of a title: lower-cased, with spaces replaced by hyphens.
pub fn anchor_key(title: &str) -> String {
    title.replace(' ', "-").to_lowercase()
}

pub fn build_modal(spec: &ModalSpec) -> Result<Markup, RenderError> {
    if spec.title.trim().is_empty() {
        return Err(RenderError::InvalidSpec(
            "title must not be empty".to_string(),
        ));
    }
    let key = anchor_key(&spec.title);
    let label: &str = spec.button_label.as_deref().unwrap_or(&spec.title);
    let class: &str = spec.button_class.as_deref().unwrap_or(DEFAULT_BUTTON_CLASS);
    Ok(html! {
        div.modal.fade id=(format!("{key}-dialog")) tabindex="-1" role="dialog" aria-labelledby=(format!("{key}-label")) aria-hidden="true" {
            div.modal-dialog {
                div.modal-content {
                    div.modal-header {
                        button.close type="button" data-dismiss="modal" {
                            span aria-hidden="true" { "×" }
                            span.sr-only { "Close" }
                        }
                        h4.modal-title id=(format!("{key}-label")) { (spec.title) }
                    }
                    div.modal-body {
                        (spec.body)
                    }
                    div.modal-footer {
                        button.btn.btn-default type="button" data-dismiss="modal" { "Cancel" }
                        button type="button" class=(format!("btn {class}")) data-dismiss="modal" { (label) }
                    }
                }
            }
        }
    })
}
