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

use maud::Markup;

use crate::context::RenderContext;

/// A named region of the page shell that a page may override.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Slot {
    /// Contents of the `<title>` element.
    Title,
    /// The stylesheet links.
    Stylesheet,
    /// Extra elements at the end of `<head>`.
    Meta,
    /// The login/logout link in the header bar.
    LoginWidget,
    /// Extra content in the header bar.
    Header,
    /// The page body.
    Main,
    /// Scripts at the end of `<body>`.
    Script,
}

type Renderer = Box<dyn Fn(&RenderContext) -> Markup + Send + Sync>;

/// Slot overrides for one page. A slot without an override renders its
/// default fragment.
#[derive(Default)]
pub struct Slots {
    overrides: HashMap<Slot, Renderer>,
}

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides a slot with a render function.
    pub fn with<F>(mut self, slot: Slot, renderer: F) -> Self
    where
        F: Fn(&RenderContext) -> Markup + Send + Sync + 'static,
    {
        self.overrides.insert(slot, Box::new(renderer));
        self
    }

    /// Overrides a slot with fixed markup.
    pub fn with_markup(self, slot: Slot, markup: Markup) -> Self {
        self.with(slot, move |_| markup.clone())
    }

    /// Renders `slot`: the override if there is one, otherwise `default`.
    pub fn render<D>(&self, slot: Slot, ctx: &RenderContext, default: D) -> Markup
    where
        D: FnOnce(&RenderContext) -> Markup,
    {
        match self.overrides.get(&slot) {
            Some(renderer) => renderer(ctx),
            None => default(ctx),
        }
    }
}
