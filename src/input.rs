//! Loading of the target list and the exclusion list.

use std::path::Path;

use tracing::debug;

use crate::error::{AppError, Result};
use crate::stopwords::StopwordSet;

/// Reads the whole targets file before any processing starts.
pub async fn load_targets(path: &Path) -> Result<Vec<String>> {
    let text = read(path).await?;
    let targets = parse_targets(&text);
    debug!(path = %path.display(), count = targets.len(), "loaded targets");
    Ok(targets)
}

/// One address per line. Blank lines and `#` comments are skipped.
pub fn parse_targets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// No exclude file means nothing is filtered.
pub async fn load_stopwords(path: Option<&Path>) -> Result<StopwordSet> {
    let Some(path) = path else {
        return Ok(StopwordSet::empty());
    };
    let set = StopwordSet::from_lines(&read(path).await?);
    debug!(path = %path.display(), count = set.len(), "loaded stopwords");
    Ok(set)
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AppError::InputError {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_skip_blank_and_comment_lines() {
        let text = "https://example.com\n\n  example.org/page  \n# disabled.net\r\n";
        assert_eq!(
            parse_targets(text),
            vec!["https://example.com".to_string(), "example.org/page".to_string()]
        );
    }

    #[test]
    fn targets_keep_duplicates_in_order() {
        assert_eq!(parse_targets("a\nb\na"), vec!["a", "b", "a"]);
    }

    #[tokio::test]
    async fn missing_exclude_path_yields_empty_set() {
        assert!(load_stopwords(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_targets_file_is_an_input_error() {
        let path = Path::new("/definitely/not/here/targets.txt");
        let err = load_targets(path).await.unwrap_err();
        assert!(matches!(err, AppError::InputError { .. }));
    }

    #[tokio::test]
    async fn files_are_read_from_disk() {
        let dir = std::env::temp_dir().join(format!("page-digest-input-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let targets = dir.join("targets.txt");
        let exclude = dir.join("exclude.txt");
        tokio::fs::write(&targets, "one.example\ntwo.example\n").await.unwrap();
        tokio::fs::write(&exclude, "The\nA\n").await.unwrap();

        assert_eq!(load_targets(&targets).await.unwrap().len(), 2);
        let stopwords = load_stopwords(Some(&exclude)).await.unwrap();
        assert!(stopwords.contains("the"));
        assert!(stopwords.contains("a"));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
