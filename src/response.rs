// Decoding of crawler response bodies
use crate::model::{CrawlError, CrawlResult, ProcessedHtml};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where the binary keeps bodies the crawler sent that were not JSON.
pub const DEBUG_DUMP_DIR: &str = "logs/responses";

pub fn parse_crawl_result(body: &str) -> Result<CrawlResult, CrawlError> {
    parse_json(body)
}

pub fn parse_processed(body: &str) -> Result<BTreeMap<String, ProcessedHtml>, CrawlError> {
    parse_json(body)
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, CrawlError> {
    serde_json::from_str(body).map_err(|source| CrawlError::InvalidJson {
        source,
        body: body.to_string(),
    })
}

/// Writes `body` to `<folder>/debug-<timestamp>.txt`, creating the folder.
pub fn save_debug_body(folder: &Path, body: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(folder)?;
    let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    let filename = folder.join(format!("debug-{}.txt", stamp));
    fs::write(&filename, body)?;
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_comes_back_untouched() {
        let body = r#"{"http://a.com/": {"html": "<p>a</p>", "n": 1}, "http://b.com/": null}"#;
        let result = parse_crawl_result(body).unwrap();
        assert_eq!(serde_json::Value::Object(result), serde_json::from_str::<serde_json::Value>(body).unwrap());
    }

    #[test]
    fn non_json_fails_and_keeps_body() {
        let err = parse_crawl_result("<html>502 Bad Gateway</html>").unwrap_err();
        match err {
            CrawlError::InvalidJson { body, .. } => assert_eq!(body, "<html>502 Bad Gateway</html>"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn json_that_is_not_an_object_fails() {
        assert!(parse_crawl_result("[1, 2, 3]").is_err());
        assert!(parse_crawl_result("\"text\"").is_err());
        assert!(parse_crawl_result("").is_err());
    }

    #[test]
    fn truncated_object_fails() {
        assert!(parse_crawl_result(r#"{"http://a.com/": "<html>"#).is_err());
    }

    #[test]
    fn invalid_body_is_dumped_to_folder() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("logs").join("responses");
        let err = parse_crawl_result("<html>not json</html>").unwrap_err();

        let path = save_debug_body(&folder, err.body().unwrap()).unwrap();

        assert_eq!(path.parent(), Some(folder.as_path()));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("debug-") && name.ends_with(".txt"), "{}", name);
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html>not json</html>");
    }

    #[test]
    fn processed_pages_decode() {
        let body = json!({
            "http://a.com/": {"title": "A", "content": "text", "h1": ["Welcome"]},
            "http://b.com/": {}
        })
        .to_string();

        let pages = parse_processed(&body).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages["http://a.com/"].title, "A");
        assert_eq!(pages["http://a.com/"].h1, vec!["Welcome".to_string()]);
        assert_eq!(pages["http://b.com/"], ProcessedHtml::default());
    }
}
