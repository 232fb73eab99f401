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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;

use crate::error::Fallible;
use crate::error::fail;

/// Characters escaped when a value is used as a single path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Joins URL path pieces with exactly one slash between them.
///
/// A leading slash on the first piece and a trailing slash on the last piece
/// are preserved. Empty pieces are skipped.
pub fn url_path_join(pieces: &[&str]) -> String {
    let (Some(first), Some(last)) = (pieces.first(), pieces.last()) else {
        return String::new();
    };
    let initial = first.starts_with('/');
    let trailing = last.ends_with('/');
    let joined: Vec<&str> = pieces
        .iter()
        .map(|piece| piece.trim_matches('/'))
        .filter(|piece| !piece.is_empty())
        .collect();
    let mut result = joined.join("/");
    if initial {
        result.insert(0, '/');
    }
    if trailing {
        result.push('/');
    }
    if result == "//" {
        result = "/".to_string();
    }
    result
}

/// Percent-encodes a value for use as one path segment.
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// Appends query arguments to a URL, percent-encoding keys and values.
pub fn url_concat(url: &str, args: &[(&str, &str)]) -> String {
    if args.is_empty() {
        return url.to_string();
    }
    let query: Vec<String> = args
        .iter()
        .map(|(key, value)| format!("{}={}", encode_segment(key), encode_segment(value)))
        .collect();
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{}", query.join("&"))
}

/// Normalizes the hub prefix: it gets a leading and a trailing slash, and is
/// nested under `base_url` if it isn't already. The root path is not a valid
/// prefix.
pub fn normalize_hub_prefix(base_url: &str, prefix: &str) -> Fallible<String> {
    if prefix == "/" {
        return fail("'/' is not a valid hub prefix.");
    }
    let mut normalized = prefix.to_string();
    if !normalized.starts_with('/') {
        normalized.insert(0, '/');
    }
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    // Compare against the base with its trailing slash, so that `/jupyter`
    // doesn't count as containing `/jupyterhub/`.
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    if !normalized.starts_with(&base) {
        normalized = url_path_join(&[&base, &normalized]);
    }
    Ok(normalized)
}
