use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use unicode_width::UnicodeWidthStr;

use crate::CliError;

// ── Table layout ────────────────────────────────────────────────────

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
/// Uses Unicode display width so Turkish titles and CJK stay aligned.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s.chars().take(width).collect();
    }

    // Walk chars, accumulating display width, stop at width - 2 to leave room for ".."
    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            end_byte = i;
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }

    format!("{}..", &s[..end_byte])
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = UnicodeWidthStr::width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

// ── Files ───────────────────────────────────────────────────────────

/// `-` means stdout.
pub(crate) fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

pub(crate) fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read {}: {}", path.display(), e)))
}

/// Replace `path` with `contents` via a sibling temp file, so a crash never
/// leaves a half-written registry behind.
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    if is_stdout(path) {
        let mut out = io::stdout().lock();
        return out
            .write_all(contents.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| CliError::io(format!("cannot write to stdout: {}", e)));
    }

    ensure_parent(path)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, contents)
        .and_then(|_| fs::rename(&tmp, path))
        .map_err(|e| {
            let _ = fs::remove_file(&tmp);
            CliError::io(format!("cannot write {}: {}", path.display(), e))
        })
}

/// Buffered writer for a streamed document (file or stdout).
pub(crate) fn create_writer(path: &Path) -> Result<Box<dyn Write>, CliError> {
    if is_stdout(path) {
        return Ok(Box::new(io::BufWriter::new(io::stdout().lock())));
    }
    ensure_parent(path)?;
    let f = fs::File::create(path)
        .map_err(|e| CliError::io(format!("cannot create {}: {}", path.display(), e)))?;
    Ok(Box::new(io::BufWriter::new(f)))
}

fn ensure_parent(path: &Path) -> Result<(), CliError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| CliError::io(format!("cannot create {}: {}", parent.display(), e))),
        _ => Ok(()),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_and_truncate() {
        assert_eq!(pad_right("D92", 6), "D92   ");
        assert_eq!(pad_right("TS EN IEC 60296", 8), "TS EN ..");
        assert_eq!(truncate_display("Akışkanlar", 4), "Ak..");
        assert_eq!(truncate_display("abc", 2), "ab");
    }

    #[test]
    fn write_file_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/astm_actual.json");
        write_file(&path, "[]\n").unwrap();
        write_file(&path, "[{}]\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[{}]\n");
        assert!(!tmp_path(&path).exists());
    }
}
