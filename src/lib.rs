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

//! Server-rendered page shell for a multi-user notebook hub: the document
//! skeleton with overridable slots, the modal dialog builder, and a small
//! server that hosts them.

pub mod assets;
pub mod cli;
pub mod client_data;
pub mod config;
pub mod context;
pub mod error;
pub mod error_page;
pub mod home;
pub mod modal;
pub mod server;
pub mod session;
pub mod shell;
pub mod slots;
pub mod url;
