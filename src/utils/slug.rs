use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-zA-Z0-9\-_]").unwrap()
});

/// 从群组标题生成 URL 友好的 slug
pub fn generate_slug(title: &str) -> String {
    // 转换为小写
    let mut slug = title.to_lowercase();

    // 替换空格为连字符
    slug = slug.replace(' ', "-");

    // 移除所有非字母数字和连字符的字符
    slug = SLUG_REGEX.replace_all(&slug, "").to_string();

    // 移除连续的连字符
    let consecutive_hyphens = Regex::new(r"-+").unwrap();
    slug = consecutive_hyphens.replace_all(&slug, "-").to_string();

    // 移除开头和结尾的连字符
    slug = slug.trim_matches('-').to_string();

    // 限制长度
    if slug.len() > 100 {
        slug = slug.chars().take(100).collect();
        if let Some(last_hyphen) = slug.rfind('-') {
            if last_hyphen > 50 {
                slug = slug[..last_hyphen].to_string();
            }
        }
    }

    // 如果 slug 为空，使用默认值
    if slug.is_empty() {
        slug = "untitled".to_string();
    }

    slug
}

/// 验证 slug 格式是否正确
pub fn is_valid_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > 100 {
        return false;
    }

    // 检查是否只包含允许的字符
    static VALID_CHARS: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^[a-zA-Z0-9\-_]+$").unwrap()
    });
    if !VALID_CHARS.is_match(slug) {
        return false;
    }

    // 不能以连字符开头或结尾
    if slug.starts_with('-') || slug.ends_with('-') {
        return false;
    }

    // 不能包含连续的连字符
    if slug.contains("--") {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Rust Fans"), "rust-fans");
        assert_eq!(generate_slug("Cats & Dogs"), "cats-dogs");
        assert_eq!(generate_slug("Hello, World! How are you?"), "hello-world-how-are-you");
        assert_eq!(generate_slug(""), "untitled");
        assert_eq!(generate_slug("   "), "untitled");
        assert_eq!(generate_slug("---"), "untitled");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("rust-fans"));
        assert!(is_valid_slug("group_1"));
        assert!(is_valid_slug("hello123"));

        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-hello"));
        assert!(!is_valid_slug("hello-"));
        assert!(!is_valid_slug("hello--world"));
        assert!(!is_valid_slug("hello world"));
        assert!(!is_valid_slug("hello@world"));
    }
}
