//! Source encoding resolution and streaming line decoding.
//!
//! Input files are never loaded whole: [`DecodedLines`] pulls fixed-size
//! blocks from the reader, runs them through an `encoding_rs` decoder and
//! hands out one line at a time.

use std::io::{self, Read};

use encoding_rs::{CoderResult, Decoder, Encoding, GBK, UTF_16BE, UTF_16LE, UTF_8};

/// Block size used when pulling raw bytes from the input.
pub const READ_BUFFER_SIZE: usize = 4096;

/// Source encodings accepted on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// `utf-8`, `utf8`.
    #[default]
    Utf8,
    /// `utf-16`, `utf16`, `utf-16le`.
    Utf16Le,
    /// `utf-16be`.
    Utf16Be,
    /// `gbk`, `ansi`.
    Gbk,
}

impl TextEncoding {
    /// Resolve an encoding label. Matching ignores ASCII case and surrounding
    /// whitespace; unknown labels yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "utf-16" | "utf16" | "utf-16le" => Some(Self::Utf16Le),
            "utf-16be" => Some(Self::Utf16Be),
            "gbk" | "ansi" => Some(Self::Gbk),
            _ => None,
        }
    }

    /// Canonical label used in logs and run summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16Le => "utf-16le",
            Self::Utf16Be => "utf-16be",
            Self::Gbk => "gbk",
        }
    }

    /// Backing `encoding_rs` codec.
    pub fn codec(self) -> &'static Encoding {
        match self {
            Self::Utf8 => UTF_8,
            Self::Utf16Le => UTF_16LE,
            Self::Utf16Be => UTF_16BE,
            Self::Gbk => GBK,
        }
    }

    /// Fresh decoder that strips a leading BOM of this encoding.
    pub fn new_decoder(self) -> Decoder {
        self.codec().new_decoder_with_bom_removal()
    }
}

/// Iterator over decoded lines of a byte stream.
///
/// Lines are split on `\n`; a `\r` right before the terminator is dropped.
/// A final unterminated line is still yielded and an empty stream yields
/// nothing. Malformed input is replaced with U+FFFD.
pub struct DecodedLines<R> {
    reader: R,
    encoding: TextEncoding,
    decoder: Decoder,
    raw: Box<[u8]>,
    pending: String,
    scan_from: usize,
    eof: bool,
    had_replacements: bool,
}

impl<R: Read> DecodedLines<R> {
    /// Wrap `reader`, decoding it as `encoding`.
    pub fn new(reader: R, encoding: TextEncoding) -> Self {
        Self {
            reader,
            encoding,
            decoder: encoding.new_decoder(),
            raw: vec![0u8; READ_BUFFER_SIZE].into_boxed_slice(),
            pending: String::new(),
            scan_from: 0,
            eof: false,
            had_replacements: false,
        }
    }

    /// Whether any malformed byte sequence has been replaced so far.
    pub fn had_replacements(&self) -> bool {
        self.had_replacements
    }

    /// Give back the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> io::Result<()> {
        let read = loop {
            match self.reader.read(&mut self.raw) {
                Ok(n) => break n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        };
        let last = read == 0;
        let mut src = &self.raw[..read];
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(src.len())
                .unwrap_or_else(|| src.len().saturating_mul(3).saturating_add(16));
            self.pending.reserve(needed);
            let (result, consumed, replaced) =
                self.decoder.decode_to_string(src, &mut self.pending, last);
            if replaced && !self.had_replacements {
                log::warn!(
                    "input contains byte sequences invalid for {}; replaced with U+FFFD",
                    self.encoding.label()
                );
            }
            self.had_replacements |= replaced;
            src = &src[consumed..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
        self.eof = last;
        Ok(())
    }

    fn take_line(&mut self, end: usize) -> String {
        let mut line: String = self.pending.drain(..end).collect();
        if self.pending.starts_with('\n') {
            self.pending.remove(0);
        }
        if line.ends_with('\r') {
            line.pop();
        }
        self.scan_from = 0;
        line
    }
}

impl<R: Read> Iterator for DecodedLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pos) = self.pending[self.scan_from..].find('\n') {
                let end = self.scan_from + pos;
                return Some(Ok(self.take_line(end)));
            }
            self.scan_from = self.pending.len();
            if self.eof {
                if self.pending.is_empty() {
                    return None;
                }
                let end = self.pending.len();
                return Some(Ok(self.take_line(end)));
            }
            if let Err(err) = self.fill() {
                // Stop after the first hard read error.
                self.eof = true;
                self.pending.clear();
                self.scan_from = 0;
                return Some(Err(err));
            }
        }
    }
}

/// Count decoded lines in `reader`.
pub fn count_lines<R: Read>(reader: R, encoding: TextEncoding) -> io::Result<usize> {
    let mut count = 0usize;
    for line in DecodedLines::new(reader, encoding) {
        line?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(bytes: &[u8], encoding: TextEncoding) -> Vec<String> {
        DecodedLines::new(bytes, encoding)
            .collect::<io::Result<Vec<_>>>()
            .expect("decode in-memory bytes")
    }

    #[test]
    fn resolves_recognized_labels_case_insensitively() {
        assert_eq!(TextEncoding::from_name("utf-8"), Some(TextEncoding::Utf8));
        assert_eq!(TextEncoding::from_name("UTF8"), Some(TextEncoding::Utf8));
        assert_eq!(TextEncoding::from_name("utf16"), Some(TextEncoding::Utf16Le));
        assert_eq!(
            TextEncoding::from_name("utf-16le"),
            Some(TextEncoding::Utf16Le)
        );
        assert_eq!(
            TextEncoding::from_name(" UTF-16BE "),
            Some(TextEncoding::Utf16Be)
        );
        assert_eq!(TextEncoding::from_name("GBK"), Some(TextEncoding::Gbk));
        assert_eq!(TextEncoding::from_name("ansi"), Some(TextEncoding::Gbk));
    }

    #[test]
    fn rejects_unknown_labels() {
        for name in ["latin1", "shift_jis", "", "utf-32", "big5"] {
            assert_eq!(TextEncoding::from_name(name), None, "label '{}'", name);
        }
    }

    #[test]
    fn splits_lines_and_drops_carriage_returns() {
        let lines = collect(b"alpha\r\nbeta\n\ngamma", TextEncoding::Utf8);
        assert_eq!(lines, vec!["alpha", "beta", "", "gamma"]);
    }

    #[test]
    fn trailing_newline_does_not_add_an_empty_line() {
        assert_eq!(collect(b"one\ntwo\n", TextEncoding::Utf8), vec!["one", "two"]);
        assert!(collect(b"", TextEncoding::Utf8).is_empty());
    }

    #[test]
    fn handles_lines_longer_than_the_read_block() {
        let long = "x".repeat(READ_BUFFER_SIZE * 3 + 17);
        let input = format!("{}\nshort\n", long);
        let lines = collect(input.as_bytes(), TextEncoding::Utf8);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), long.len());
        assert_eq!(lines[1], "short");
    }

    #[test]
    fn multibyte_sequences_split_across_blocks_survive() {
        // Shift the text so that a 3-byte sequence straddles the block edge.
        let mut input = "a".repeat(READ_BUFFER_SIZE - 1);
        input.push_str("汉字\n");
        let lines = collect(input.as_bytes(), TextEncoding::Utf8);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("汉字"));
    }

    #[test]
    fn decodes_utf16_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "hi\nthere".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(collect(&bytes, TextEncoding::Utf16Le), vec!["hi", "there"]);

        let mut be = Vec::new();
        for unit in "hi\nthere".encode_utf16() {
            be.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(collect(&be, TextEncoding::Utf16Be), vec!["hi", "there"]);
    }

    #[test]
    fn decodes_gbk_and_flags_replacements_when_misread() {
        let (encoded, _, _) = GBK.encode("第一章 风起\n");
        let lines = collect(&encoded, TextEncoding::Gbk);
        assert_eq!(lines, vec!["第一章 风起"]);

        let mut misread = DecodedLines::new(&encoded[..], TextEncoding::Utf8);
        let line = misread.next().expect("one line").expect("decodes");
        assert!(line.contains('\u{FFFD}'));
        assert!(misread.had_replacements());
    }

    #[test]
    fn counts_lines_like_the_iterator() {
        let input = b"a\nb\r\nc";
        assert_eq!(count_lines(&input[..], TextEncoding::Utf8).expect("count"), 3);
        assert_eq!(count_lines(&b""[..], TextEncoding::Utf8).expect("count"), 0);
    }
}
