//! Line-oriented text resources (shader sources).

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Read a text file into lines, each terminated by `\n`.
///
/// A final newline is appended even when the file lacks one. An unreadable file
/// yields an empty list; whoever consumes the text (the shader compiler) reports it.
pub fn load_lines(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("Unable to open text resource {:?}: {}", path, e);
            return Vec::new();
        }
    };
    read_lines(BufReader::new(file))
}

/// Same as [`load_lines`] over any buffered reader.
pub fn read_lines<R: BufRead>(mut reader: R) -> Vec<String> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                // Only the `\n` is replaced; a CRLF file joins back byte-for-byte.
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                let mut line = String::from_utf8_lossy(&buf).into_owned();
                line.push('\n');
                lines.push(line);
            }
            Err(e) => {
                log::warn!("Text resource read stopped early: {}", e);
                break;
            }
        }
    }
    lines
}

/// Concatenate a line list back into one source string.
pub fn join_lines(lines: &[String]) -> String {
    lines.concat()
}
