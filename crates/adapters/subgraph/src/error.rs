// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Error types for subgraph queries.

use thiserror::Error;

/// Errors raised while querying a subgraph endpoint.
#[derive(Debug, Error)]
pub enum SubgraphError {
    /// Occurs when the HTTP request fails or the endpoint answers with an error status.
    #[error("Transport error: {0}")]
    Transport(String),
    /// Occurs when the endpoint reports GraphQL errors for the query.
    #[error("GraphQL error: {0}")]
    GraphQl(String),
    /// Occurs when a response or one of its fields cannot be parsed.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SubgraphError {
    /// Maps a [`reqwest::Error`] to a transport error.
    #[must_use]
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Transport(format!("Request timed out: {error}"))
        } else if let Some(status) = error.status() {
            Self::Transport(format!("HTTP {}: {error}", status.as_u16()))
        } else {
            Self::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for SubgraphError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}
