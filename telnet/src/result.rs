//
// Copyright 2026 The Teleterm Developers. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use thiserror::Error;

/// Result type for connection operations.
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Errors raised by the byte filter.
///
/// The filter itself never rejects malformed input (unknown commands are
/// dropped with a warning), so in practice this only carries I/O errors
/// surfaced through the `Decoder`/`Encoder` traits.
#[derive(Debug, Error)]
pub enum FilterError {
    /// An I/O error occurred on the underlying stream.
    #[error("i/o error while filtering: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by [`TelnetConnection`](crate::TelnetConnection) operations.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The TCP connect failed: host unreachable, refused, or name resolution.
    #[error("connection to {addr} failed: {source}")]
    ConnectFailed {
        /// The `host:port` address that was dialed.
        addr: String,
        /// The underlying socket error.
        source: std::io::Error,
    },

    /// The TCP connect did not complete within the allowed time.
    #[error("connection to {0} timed out")]
    Timeout(String),

    /// The operation was attempted on a closed or never-opened channel.
    #[error("not connected")]
    NotConnected,

    /// A write or flush failed on a live-but-now-broken stream.
    #[error("write failed: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// An encoding error while preparing outbound bytes.
    #[error(transparent)]
    Filter(#[from] FilterError),
}
