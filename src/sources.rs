use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("urls file `{0}` not found on the server")]
    Missing(String),
    #[error("urls file `{0}` is empty")]
    Empty(String),
    #[error("failed reading urls file `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Reads the newline-delimited URL list, trimming whitespace and dropping
/// blank lines. `empty_is_error` decides whether an absent or empty list is
/// a configuration failure or a valid "no catalog" state.
pub fn load_urls(path: &str, empty_is_error: bool) -> Result<Vec<String>, SourceError> {
    if !Path::new(path).exists() {
        if empty_is_error {
            return Err(SourceError::Missing(path.to_string()));
        }
        return Ok(Vec::new());
    }

    let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_string(),
        source,
    })?;

    let urls: Vec<String> = raw
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect();

    if urls.is_empty() && empty_is_error {
        return Err(SourceError::Empty(path.to_string()));
    }

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "radar-urls-{}-{}.txt",
            std::process::id(),
            contents.len()
        ));
        let mut file = std::fs::File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        path
    }

    #[test]
    fn drops_blank_lines_and_trims() {
        let path = temp_file("https://a.example/MLB1\n\n  https://b.example/MLB2  \n\n");
        let urls = load_urls(path.to_str().unwrap(), true).expect("load");
        assert_eq!(
            urls,
            vec!["https://a.example/MLB1", "https://b.example/MLB2"]
        );
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_error_by_default() {
        let err = load_urls("/definitely/not/here/urls.txt", true).unwrap_err();
        assert!(matches!(err, SourceError::Missing(_)));
    }

    #[test]
    fn missing_file_is_empty_catalog_when_allowed() {
        let urls = load_urls("/definitely/not/here/urls.txt", false).expect("load");
        assert!(urls.is_empty());
    }

    #[test]
    fn empty_file_policy() {
        let path = temp_file("\n   \n");
        assert!(matches!(
            load_urls(path.to_str().unwrap(), true),
            Err(SourceError::Empty(_))
        ));
        assert!(
            load_urls(path.to_str().unwrap(), false)
                .expect("load")
                .is_empty()
        );
        let _ = std::fs::remove_file(path);
    }
}
