// src/utils.rs
use anyhow::Result;

pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "docx"];

/// Strip trailing slashes so paths can be appended with a leading `/`.
pub fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and a path that may or may not start with `/`.
pub fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<()> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", filename))?;

    if !allowed.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            allowed
        );
    }

    Ok(())
}

/// Content type for a resume upload
pub fn resume_content_type(file_name: &str) -> Result<&'static str> {
    validate_file_extension(file_name, RESUME_EXTENSIONS)?;
    match get_file_extension(file_name).as_deref() {
        Some("pdf") => Ok("application/pdf"),
        _ => Ok("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    }
}
