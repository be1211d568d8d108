//! Command frames and their wire encoding.
//!
//! A command is a name plus an ordered list of byte-string arguments.
//! On the wire it is encoded as newline-terminated headers with raw,
//! length-prefixed argument payloads:
//!
//! ```text
//! <name>\n
//! <argCount>\n
//! <len(arg1)>\n<arg1 raw bytes>
//! <len(arg2)>\n<arg2 raw bytes>
//! ...
//! ```
//!
//! The length prefix is authoritative: argument bytes are never escaped, and
//! embedded newlines or NUL bytes are legal payload content.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// Command
// ============================================================================

/// A single protocol command: a name and its ordered arguments.
///
/// Arguments are kept as raw byte strings; the server treats them as opaque
/// data of a declared length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command name, e.g. `Visit` or `FindXpath`.
    name: String,
    /// Ordered argument payloads.
    args: Vec<Vec<u8>>,
}

impl Command {
    /// Creates a command with no arguments.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Creates a command from string arguments.
    #[must_use]
    pub fn with_args<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            args: args
                .into_iter()
                .map(|a| a.as_ref().as_bytes().to_vec())
                .collect(),
        }
    }

    /// Appends a string argument.
    #[inline]
    pub fn push_arg(&mut self, arg: impl AsRef<str>) {
        self.args.push(arg.as_ref().as_bytes().to_vec());
    }

    /// Appends a raw byte-string argument.
    #[inline]
    pub fn push_raw_arg(&mut self, arg: impl Into<Vec<u8>>) {
        self.args.push(arg.into());
    }

    /// Returns the command name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered arguments.
    #[inline]
    #[must_use]
    pub fn args(&self) -> &[Vec<u8>] {
        &self.args
    }

    /// Encodes the command into its wire representation.
    ///
    /// The whole frame is assembled into one buffer so the transport can
    /// issue a single write per command.
    #[must_use]
    pub fn to_wire(&self) -> Vec<u8> {
        let body_len: usize = self.args.iter().map(Vec::len).sum();
        let mut frame = Vec::with_capacity(self.name.len() + body_len + 16 * (self.args.len() + 2));

        frame.extend_from_slice(self.name.as_bytes());
        frame.push(b'\n');
        frame.extend_from_slice(self.args.len().to_string().as_bytes());
        frame.push(b'\n');

        for arg in &self.args {
            frame.extend_from_slice(arg.len().to_string().as_bytes());
            frame.push(b'\n');
            frame.extend_from_slice(arg);
        }

        frame
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} args)", self.name, self.args.len())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    /// Reference decoder for the wire grammar, used to check `to_wire`.
    fn decode_wire(frame: &[u8]) -> (String, Vec<Vec<u8>>) {
        fn take_line<'a>(rest: &mut &'a [u8]) -> &'a [u8] {
            let pos = rest.iter().position(|&b| b == b'\n').expect("line");
            let (line, tail) = rest.split_at(pos);
            *rest = &tail[1..];
            line
        }

        let mut rest = frame;
        let name = String::from_utf8(take_line(&mut rest).to_vec()).expect("utf8 name");
        let count: usize = String::from_utf8_lossy(take_line(&mut rest))
            .parse()
            .expect("count");

        let mut args = Vec::with_capacity(count);
        for _ in 0..count {
            let len: usize = String::from_utf8_lossy(take_line(&mut rest))
                .parse()
                .expect("len");
            let (payload, tail) = rest.split_at(len);
            args.push(payload.to_vec());
            rest = tail;
        }

        assert!(rest.is_empty(), "trailing bytes after frame");
        (name, args)
    }

    #[test]
    fn test_zero_arg_frame() {
        let frame = Command::new("Reset").to_wire();
        assert_eq!(frame, b"Reset\n0\n");
    }

    #[test]
    fn test_single_arg_frame() {
        let frame = Command::with_args("Visit", ["http://example.com/"]).to_wire();
        assert_eq!(frame, b"Visit\n1\n19\nhttp://example.com/");
    }

    #[test]
    fn test_empty_arg_has_zero_length_prefix() {
        let frame = Command::with_args("Header", ["X-Flag", ""]).to_wire();
        assert_eq!(frame, b"Header\n2\n6\nX-Flag\n0\n");
    }

    #[test]
    fn test_args_with_embedded_newlines_and_nuls_are_not_escaped() {
        let mut command = Command::new("Execute");
        command.push_raw_arg(b"line one\nline two\0tail".to_vec());

        let frame = command.to_wire();
        assert_eq!(frame, b"Execute\n1\n22\nline one\nline two\0tail");

        let (name, args) = decode_wire(&frame);
        assert_eq!(name, "Execute");
        assert_eq!(args, vec![b"line one\nline two\0tail".to_vec()]);
    }

    #[test]
    fn test_argument_order_is_preserved() {
        let frame = Command::with_args("SetProxy", ["localhost", "0", "", ""]).to_wire();
        let (_, args) = decode_wire(&frame);
        assert_eq!(args, vec![b"localhost".to_vec(), b"0".to_vec(), vec![], vec![]]);
    }

    proptest! {
        #[test]
        fn prop_wire_round_trip(
            name in "[A-Za-z][A-Za-z0-9]{0,20}",
            args in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..256), 0..8),
        ) {
            let mut command = Command::new(&name);
            for arg in &args {
                command.push_raw_arg(arg.clone());
            }

            let (decoded_name, decoded_args) = decode_wire(&command.to_wire());
            prop_assert_eq!(decoded_name, name);
            prop_assert_eq!(decoded_args, args);
        }
    }
}
