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

//! Client error types.

use teleterm_telnet::ConnectionError;
use thiserror::Error;

/// Errors raised by a [`TerminalSession`](crate::TerminalSession).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying Telnet channel failed.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The session was used after [`close`](crate::TerminalSession::close).
    #[error("session is closed")]
    Closed,
}

/// Client result type.
pub type Result<T> = std::result::Result<T, ClientError>;
