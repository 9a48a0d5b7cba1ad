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

//! Telnet wire bytes (RFC 854).

/// Interpret As Command marker.
pub const IAC: u8 = 255;
/// Sender wants the option disabled on the receiver's side.
pub const DONT: u8 = 254;
/// Sender wants the option enabled on the receiver's side.
pub const DO: u8 = 253;
/// Sender refuses to enable the option on its own side.
pub const WONT: u8 = 252;
/// Sender offers to enable the option on its own side.
pub const WILL: u8 = 251;
