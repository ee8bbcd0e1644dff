use super::ApiError;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            resource, id
        )));
    }
    Ok(id)
}

pub fn validate_tag_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Tag name is required"));
    }

    if trimmed.len() > 50 {
        return Err(ApiError::validation(
            "Tag name must be 50 characters or less",
        ));
    }

    Ok(trimmed)
}

pub fn validate_comment_text(comment: &str) -> Result<&str, ApiError> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Comment text is required"));
    }
    Ok(trimmed)
}

pub fn validate_blog_fields(title: &str, message: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::validation("Blog title is required"));
    }
    if message.trim().is_empty() {
        return Err(ApiError::validation("Blog message is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("blog", 1).is_ok());
        assert!(validate_id("blog", 12345).is_ok());
        assert!(validate_id("blog", 0).is_err());
        assert!(validate_id("blog", -1).is_err());
    }

    #[test]
    fn test_validate_tag_name() {
        assert_eq!(validate_tag_name("rust").unwrap(), "rust");
        assert_eq!(validate_tag_name("  rust  ").unwrap(), "rust");
        assert!(validate_tag_name("").is_err());
        assert!(validate_tag_name("   ").is_err());
        assert!(validate_tag_name(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_comment_text() {
        assert_eq!(validate_comment_text("nice post").unwrap(), "nice post");
        assert!(validate_comment_text("").is_err());
        assert!(validate_comment_text("  ").is_err());
    }

    #[test]
    fn test_validate_blog_fields() {
        assert!(validate_blog_fields("Title", "Body").is_ok());
        assert!(validate_blog_fields("", "Body").is_err());
        assert!(validate_blog_fields("Title", " ").is_err());
    }
}
