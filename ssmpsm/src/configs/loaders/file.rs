use std::fs;

/// Reads a value from disk. One trailing line ending is dropped so that files
/// written by editors or `echo` don't smuggle a newline into the parameter.
pub fn load(path: &str) -> Result<String, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read file '{}': {}", path, e))?;

    let trimmed = content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix('\n'))
        .unwrap_or(&content);

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_file_success() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, "file content").unwrap();

        let result = load(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(result, "file content");
    }

    #[test]
    fn test_load_file_not_found() {
        let result = load("/nonexistent/file.txt");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to read file"));
    }

    #[test]
    fn test_load_strips_single_trailing_newline() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, "line one\nline two\n\n").unwrap();

        let result = load(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(result, "line one\nline two\n");
    }

    #[test]
    fn test_load_strips_crlf() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(&temp_file, "secret\r\n").unwrap();

        let result = load(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(result, "secret");
    }
}
