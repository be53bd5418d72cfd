//! Locating the transcript index and resolving its lines to audio files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{PrepareError, PrepareResult};

/// File name of the transcript index.
pub const INDEX_FILE: &str = "texts.txt";

/// One parsed index line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRecord {
    /// File name without directories, quotes or `.wav` suffix.
    pub base_name: String,
    pub text: String,
}

/// Find `texts.txt`: the dataset root first, then anywhere below it.
pub fn find_index(root: &Path) -> PrepareResult<PathBuf> {
    let direct = root.join(INDEX_FILE);
    if direct.is_file() {
        return Ok(direct);
    }
    search_index(root)?.ok_or_else(|| PrepareError::NotFound(root.to_path_buf()))
}

// Depth-first, entries in name order, hidden directories skipped.
fn search_index(dir: &Path) -> PrepareResult<Option<PathBuf>> {
    let mut entries: Vec<_> = match fs::read_dir(dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    entries.sort_by_key(|e| e.file_name());

    for entry in &entries {
        let path = entry.path();
        if path.is_file() && entry.file_name() == INDEX_FILE {
            return Ok(Some(path));
        }
    }
    for entry in entries {
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if path.is_dir() && !hidden {
            if let Some(found) = search_index(&path)? {
                return Ok(Some(found));
            }
        }
    }
    Ok(None)
}

/// Parse one index line.
///
/// Splits on `|` when present, otherwise on `,`. Returns `None` for lines
/// with fewer than two fields. Fields past the second are ignored.
pub fn parse_line(line: &str) -> Option<TranscriptRecord> {
    let line = line.trim();
    let fields: Vec<&str> = if line.contains('|') {
        line.split('|').collect()
    } else {
        line.split(',').collect()
    };
    if fields.len() < 2 {
        return None;
    }

    Some(TranscriptRecord {
        base_name: base_name(fields[0]),
        text: fields[1].trim().to_string(),
    })
}

fn base_name(reference: &str) -> String {
    let unquoted: String = reference
        .trim()
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .collect();
    let file = unquoted
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    match file.len().checked_sub(4) {
        Some(cut) if file.is_char_boundary(cut) && file[cut..].eq_ignore_ascii_case(".wav") => {
            file[..cut].to_string()
        }
        _ => file.to_string(),
    }
}

/// Candidate audio locations, in lookup order.
pub fn candidate_paths(index_path: &Path, dataset_root: &Path, base_name: &str) -> [PathBuf; 3] {
    let file = format!("{base_name}.wav");
    let index_dir = index_path.parent().unwrap_or(dataset_root);
    [
        index_dir.join(&file),
        index_dir.join("wavs").join(&file),
        dataset_root.join(&file),
    ]
}

/// First existing candidate, if any.
pub fn resolve_audio(index_path: &Path, dataset_root: &Path, base_name: &str) -> Option<PathBuf> {
    candidate_paths(index_path, dataset_root, base_name)
        .into_iter()
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pipe_line() {
        let rec = parse_line("clip01.wav|Tenho 3 gatos\n").unwrap();
        assert_eq!(rec.base_name, "clip01");
        assert_eq!(rec.text, "Tenho 3 gatos");
    }

    #[test]
    fn test_parse_comma_line_keeps_second_field_only() {
        let rec = parse_line("\"wavs/a.WAV\", olá, mundo").unwrap();
        assert_eq!(rec.base_name, "a");
        assert_eq!(rec.text, "olá");
    }

    #[test]
    fn test_pipe_takes_precedence_over_comma() {
        let rec = parse_line("b|um, dois").unwrap();
        assert_eq!(rec.base_name, "b");
        assert_eq!(rec.text, "um, dois");
    }

    #[test]
    fn test_malformed_lines() {
        assert!(parse_line("just-a-file.wav").is_none());
        assert!(parse_line("").is_none());
    }

    #[test]
    fn test_base_name_cleanup() {
        assert_eq!(base_name("'C:\\data\\x.wav'"), "x");
        assert_eq!(base_name(" dir/sub/y "), "y");
        assert_eq!(base_name("z.mp3"), "z.mp3");
        assert_eq!(base_name("ção.wav"), "ção");
    }

    #[test]
    fn test_candidate_order() {
        let root = Path::new("/data");
        let index = Path::new("/data/nested/texts.txt");
        let c = candidate_paths(index, root, "clip");
        assert_eq!(c[0], PathBuf::from("/data/nested/clip.wav"));
        assert_eq!(c[1], PathBuf::from("/data/nested/wavs/clip.wav"));
        assert_eq!(c[2], PathBuf::from("/data/clip.wav"));
    }

    #[test]
    fn test_find_index_nested_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            find_index(dir.path()),
            Err(PrepareError::NotFound(_))
        ));

        fs::create_dir_all(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join(".cache").join(INDEX_FILE), "x|y").unwrap();
        assert!(find_index(dir.path()).is_err());

        fs::create_dir_all(dir.path().join("b/deep")).unwrap();
        fs::write(dir.path().join("b/deep").join(INDEX_FILE), "x|y").unwrap();
        let found = find_index(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("b/deep").join(INDEX_FILE));

        fs::write(dir.path().join(INDEX_FILE), "x|y").unwrap();
        assert_eq!(find_index(dir.path()).unwrap(), dir.path().join(INDEX_FILE));
    }

    #[test]
    fn test_resolve_prefers_index_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join(INDEX_FILE);
        fs::create_dir_all(dir.path().join("wavs")).unwrap();
        fs::write(dir.path().join("wavs/a.wav"), b"").unwrap();
        assert_eq!(
            resolve_audio(&index, dir.path(), "a"),
            Some(dir.path().join("wavs/a.wav"))
        );
        fs::write(dir.path().join("a.wav"), b"").unwrap();
        assert_eq!(
            resolve_audio(&index, dir.path(), "a"),
            Some(dir.path().join("a.wav"))
        );
        assert_eq!(resolve_audio(&index, dir.path(), "missing"), None);
    }
}
