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

use crate::consts;
use crate::result::FilterError;
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

/// A Telnet option-negotiation verb.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verb {
    /// The remote offers to enable an option on its side.
    Will,
    /// The remote declares an option disabled on its side.
    Wont,
    /// The remote asks us to enable an option on our side.
    Do,
    /// The remote asks us to keep an option disabled on our side.
    Dont,
}

impl Verb {
    fn from_byte(byte: u8) -> Option<Verb> {
        match byte {
            consts::WILL => Some(Verb::Will),
            consts::WONT => Some(Verb::Wont),
            consts::DO => Some(Verb::Do),
            consts::DONT => Some(Verb::Dont),
            _ => None,
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            Verb::Will => consts::WILL,
            Verb::Wont => consts::WONT,
            Verb::Do => consts::DO,
            Verb::Dont => consts::DONT,
        }
    }
}

/// An event produced by filtering the inbound byte stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TelnetEvent {
    /// A clean text byte, IAC framing removed. `IAC IAC` decodes to a single
    /// `Data(0xFF)`. CR, LF and BS pass through here verbatim; the terminal
    /// emulator gives them meaning.
    Data(u8),
    /// The remote side proposed (`WILL`) or requested (`DO`) an option, or
    /// withdrew one (`WONT`/`DONT`). Produces no output text.
    Negotiation {
        /// The negotiation verb that followed the IAC byte.
        verb: Verb,
        /// The negotiated option code.
        option: u8,
    },
}

impl TelnetEvent {
    /// The refusal owed in response to this event, if any.
    ///
    /// Every `DO` is answered with `WONT` and every `WILL` with `DONT`;
    /// no option is ever accepted. `WONT`/`DONT` and plain data owe nothing.
    pub fn refusal(&self) -> Option<Refusal> {
        match *self {
            TelnetEvent::Negotiation {
                verb: Verb::Do,
                option,
            } => Some(Refusal {
                verb: Verb::Wont,
                option,
            }),
            TelnetEvent::Negotiation {
                verb: Verb::Will,
                option,
            } => Some(Refusal {
                verb: Verb::Dont,
                option,
            }),
            _ => None,
        }
    }
}

/// An outbound negotiation refusal, encoded as `IAC verb option`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Refusal {
    /// The refusing verb (`Wont` in answer to `Do`, `Dont` in answer to `Will`).
    pub verb: Verb,
    /// The option code being refused.
    pub option: u8,
}

/// Internal state of the inbound byte filter.
#[derive(Clone, Copy, Debug)]
enum FilterState {
    /// Passing text through.
    Text,
    /// Received IAC, next byte is a command or verb.
    Command,
    /// Received a negotiation verb, next byte is the option code.
    Negotiation(Verb),
}

/// Byte-level Telnet filter for one connection.
///
/// Inbound, [`Decoder::decode`] consumes raw socket bytes and emits
/// [`TelnetEvent`]s: plain data with IAC escaping undone, and negotiation
/// requests for the caller to refuse. Outbound, the [`Encoder`]
/// implementations escape every literal `0xFF` by doubling it.
///
/// State is per-connection; a fresh connection gets a fresh filter, so a
/// partially-consumed command sequence is never replayed across sessions.
pub struct TelnetFilter {
    state: FilterState,
}

impl TelnetFilter {
    /// Creates a filter in the text (ground) state.
    pub fn new() -> TelnetFilter {
        TelnetFilter {
            state: FilterState::Text,
        }
    }
}

impl Default for TelnetFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for TelnetFilter {
    type Item = TelnetEvent;
    type Error = FilterError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TelnetEvent>, Self::Error> {
        while src.remaining() > 0 {
            let byte = src.get_u8();
            match (self.state, byte) {
                (FilterState::Text, consts::IAC) => {
                    self.state = FilterState::Command;
                }
                (FilterState::Text, _) => {
                    return Ok(Some(TelnetEvent::Data(byte)));
                }
                (FilterState::Command, consts::IAC) => {
                    // Escaped IAC: a literal 0xFF data byte.
                    self.state = FilterState::Text;
                    return Ok(Some(TelnetEvent::Data(consts::IAC)));
                }
                (FilterState::Command, _) => match Verb::from_byte(byte) {
                    Some(verb) => {
                        self.state = FilterState::Negotiation(verb);
                    }
                    None => {
                        warn!("dropping unknown telnet command {:#04X}", byte);
                        self.state = FilterState::Text;
                    }
                },
                (FilterState::Negotiation(verb), _) => {
                    self.state = FilterState::Text;
                    return Ok(Some(TelnetEvent::Negotiation { verb, option: byte }));
                }
            }
        }
        Ok(None)
    }
}

impl Encoder<u8> for TelnetFilter {
    type Error = FilterError;

    fn encode(&mut self, item: u8, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(2);
        if item == consts::IAC {
            dst.put_u8(consts::IAC);
        }
        dst.put_u8(item);
        Ok(())
    }
}

impl Encoder<&str> for TelnetFilter {
    type Error = FilterError;

    fn encode(&mut self, item: &str, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        for byte in item.as_bytes() {
            self.encode(*byte, dst)?;
        }
        Ok(())
    }
}

impl Encoder<Refusal> for TelnetFilter {
    type Error = FilterError;

    fn encode(&mut self, item: Refusal, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(3);
        dst.put_u8(consts::IAC);
        dst.put_u8(item.verb.to_byte());
        dst.put_u8(item.option);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_all(filter: &mut TelnetFilter, mut src: BytesMut) -> Vec<TelnetEvent> {
        let mut out = Vec::new();
        while let Some(event) = filter.decode(&mut src).expect("decode should not error") {
            out.push(event);
        }
        out
    }

    #[test]
    fn decode_plain_text_passes_through() {
        let mut filter = TelnetFilter::new();
        let events = collect_all(&mut filter, BytesMut::from(&b"Hi\r\n"[..]));
        assert_eq!(
            events,
            vec![
                TelnetEvent::Data(b'H'),
                TelnetEvent::Data(b'i'),
                TelnetEvent::Data(b'\r'),
                TelnetEvent::Data(b'\n'),
            ]
        );
    }

    #[test]
    fn decode_control_bytes_pass_verbatim() {
        let mut filter = TelnetFilter::new();
        let events = collect_all(&mut filter, BytesMut::from(&[0x08, 0x1B, b'['][..]));
        assert_eq!(
            events,
            vec![
                TelnetEvent::Data(0x08),
                TelnetEvent::Data(0x1B),
                TelnetEvent::Data(b'['),
            ]
        );
    }

    #[test]
    fn decode_iac_iac_unescapes_to_literal() {
        let mut filter = TelnetFilter::new();
        let events = collect_all(&mut filter, BytesMut::from(&[consts::IAC, consts::IAC][..]));
        assert_eq!(events, vec![TelnetEvent::Data(0xFF)]);
    }

    #[test]
    fn decode_do_yields_negotiation_refused_with_wont() {
        let mut filter = TelnetFilter::new();
        let events = collect_all(&mut filter, BytesMut::from(&[consts::IAC, consts::DO, 1][..]));
        assert_eq!(
            events,
            vec![TelnetEvent::Negotiation {
                verb: Verb::Do,
                option: 1
            }]
        );
        assert_eq!(
            events[0].refusal(),
            Some(Refusal {
                verb: Verb::Wont,
                option: 1
            })
        );
    }

    #[test]
    fn decode_will_yields_negotiation_refused_with_dont() {
        let mut filter = TelnetFilter::new();
        let events = collect_all(
            &mut filter,
            BytesMut::from(&[consts::IAC, consts::WILL, 31][..]),
        );
        assert_eq!(
            events,
            vec![TelnetEvent::Negotiation {
                verb: Verb::Will,
                option: 31
            }]
        );
        assert_eq!(
            events[0].refusal(),
            Some(Refusal {
                verb: Verb::Dont,
                option: 31
            })
        );
    }

    #[test]
    fn decode_wont_and_dont_owe_no_reply() {
        let mut filter = TelnetFilter::new();
        let events = collect_all(
            &mut filter,
            BytesMut::from(&[consts::IAC, consts::WONT, 3, consts::IAC, consts::DONT, 24][..]),
        );
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.refusal().is_none()));
    }

    #[test]
    fn decode_negotiation_emits_no_text() {
        let mut filter = TelnetFilter::new();
        let events = collect_all(
            &mut filter,
            BytesMut::from(&[b'a', consts::IAC, consts::DO, 1, b'b'][..]),
        );
        let text: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                TelnetEvent::Data(byte) => Some(*byte),
                _ => None,
            })
            .collect();
        assert_eq!(text, b"ab");
    }

    #[test]
    fn decode_unknown_command_is_dropped() {
        let mut filter = TelnetFilter::new();
        // IAC NOP (241) is a two-byte command we consume without output.
        let events = collect_all(
            &mut filter,
            BytesMut::from(&[b'x', consts::IAC, 241, b'y'][..]),
        );
        assert_eq!(events, vec![TelnetEvent::Data(b'x'), TelnetEvent::Data(b'y')]);
    }

    #[test]
    fn decode_resumes_across_split_sequences() {
        // A negotiation split over three reads must still decode as one event.
        let mut filter = TelnetFilter::new();
        let mut first = BytesMut::from(&[consts::IAC][..]);
        assert!(filter.decode(&mut first).unwrap().is_none());
        let mut second = BytesMut::from(&[consts::DO][..]);
        assert!(filter.decode(&mut second).unwrap().is_none());
        let mut third = BytesMut::from(&[1][..]);
        assert_eq!(
            filter.decode(&mut third).unwrap(),
            Some(TelnetEvent::Negotiation {
                verb: Verb::Do,
                option: 1
            })
        );
    }

    #[test]
    fn encode_text_doubles_literal_iac() {
        let mut filter = TelnetFilter::new();
        let mut dst = BytesMut::new();
        filter.encode("a\u{FF}b", &mut dst).expect("encode ok");
        // '\u{FF}' is two UTF-8 bytes (0xC3 0xBF); only a raw 0xFF byte is doubled.
        filter.encode(0xFFu8, &mut dst).expect("encode ok");
        assert!(dst.ends_with(&[consts::IAC, consts::IAC]));
    }

    #[test]
    fn encode_byte_escapes_iac() {
        let mut filter = TelnetFilter::new();
        let mut dst = BytesMut::new();
        filter.encode(0xFFu8, &mut dst).expect("encode ok");
        assert_eq!(&dst[..], &[consts::IAC, consts::IAC]);
    }

    #[test]
    fn encode_refusal_wire_format() {
        let mut filter = TelnetFilter::new();
        let mut dst = BytesMut::new();
        filter
            .encode(
                Refusal {
                    verb: Verb::Wont,
                    option: 1,
                },
                &mut dst,
            )
            .expect("encode ok");
        assert_eq!(&dst[..], &[consts::IAC, consts::WONT, 1]);
    }
}
