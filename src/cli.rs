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

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use maud::PreEscaped;
use tokio::runtime::Builder;

use crate::config::Config;
use crate::context::CurrentUser;
use crate::context::RenderContext;
use crate::error::Fallible;
use crate::home::render_home;
use crate::modal::ModalSpec;
use crate::modal::build_modal;
use crate::server::start_server;

#[derive(Parser, Debug, PartialEq)]
#[command(version, about, long_about = None)]
enum Command {
    /// Serve the hub pages.
    Serve {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Open the hub in a browser once the server is up.
        #[arg(long)]
        open: bool,
    },
    /// Print the home page to stdout.
    Render {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Render the page as seen by this user.
        #[arg(long)]
        user: Option<String>,
    },
    /// Print a modal dialog fragment to stdout.
    Modal {
        /// Dialog title. Also determines the dialog's DOM id.
        #[arg(long)]
        title: String,
        /// Confirm button label. Defaults to the title.
        #[arg(long)]
        button_label: Option<String>,
        /// Confirm button style class. Defaults to `btn-primary`.
        #[arg(long)]
        button_class: Option<String>,
        /// Dialog body, as HTML. Inserted without escaping.
        #[arg(long, default_value = "")]
        body: String,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve { config, open } => {
            let config = Config::load(config.as_deref())?;
            let runtime = Builder::new_multi_thread().enable_all().build()?;
            runtime.block_on(start_server(config, open))
        }
        Command::Render { config, user } => {
            let config = Config::load(config.as_deref())?;
            let assets = Arc::new(config.assets()?);
            let ctx = RenderContext::new(&config.hub_prefix()?, assets)
                .with_user(user.as_deref().map(CurrentUser::new));
            let html = render_home(&ctx)?;
            println!("{}", html.into_string());
            Ok(())
        }
        Command::Modal {
            title,
            button_label,
            button_class,
            body,
        } => {
            let spec = ModalSpec {
                title,
                button_label,
                button_class,
                body: PreEscaped(body),
            };
            let html = build_modal(&spec)?;
            println!("{}", html.into_string());
            Ok(())
        }
    }
}
