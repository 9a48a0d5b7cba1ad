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

//! # Teleterm Telnet Transport Filter
//!
//! A Telnet-aware duplex channel for a single remote session: reads raw bytes
//! from a TCP stream, removes IAC framing (RFC 854), and presents a clean text
//! byte stream to its consumer, while uniformly refusing every option the
//! remote side proposes or requests.
//!
//! Two layers:
//!
//! - [`TelnetFilter`]: the byte-level state machine, implemented as a
//!   `tokio_util::codec` [`Decoder`]/[`Encoder`] pair. Inbound it strips IAC
//!   framing and surfaces negotiation requests as [`TelnetEvent`]s; outbound
//!   it escapes literal `0xFF` bytes by doubling them.
//! - [`TelnetConnection`]: owns the socket for the lifetime of one session:
//!   `connect`, `listen` (a spawned read task with an observable
//!   [`ListenerTask`] handle), `write`, and `close`.
//!
//! No Telnet option is ever accepted and no option state is tracked: a `DO`
//! is answered with `WONT`, a `WILL` with `DONT`, unconditionally.
//!
//! [`Decoder`]: tokio_util::codec::Decoder
//! [`Encoder`]: tokio_util::codec::Encoder

mod connection;
mod consts;
mod filter;
mod result;

pub use self::connection::{ListenerTask, TelnetConnection, TextSink};
pub use self::filter::{Refusal, TelnetEvent, TelnetFilter, Verb};
pub use self::result::{ConnectionError, ConnectionResult, FilterError};
