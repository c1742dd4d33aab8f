//! # HTML 文本工具
//!
//! 编辑器正文是 HTML，字数和阅读时长需要先去掉标签再统计。

use std::sync::LazyLock;

use regex::Regex;

/// 阅读速度（词/分钟）
const WORDS_PER_MINUTE: usize = 200;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]*>").expect("static regex")
});

/// 去除所有 HTML 标签，标签替换为空格以免相邻段落的词粘连
pub fn strip_tags(html: &str) -> String {
    TAG_PATTERN.replace_all(html, " ").into_owned()
}

/// 统计去除标签后以空白分隔的词数
pub fn word_count(html: &str) -> usize {
    strip_tags(html).split_whitespace().count()
}

/// 预计阅读时长（分钟，向上取整）
pub fn reading_minutes(html: &str) -> usize {
    word_count(html).div_ceil(WORDS_PER_MINUTE)
}

/// 人类可读的文件大小：B / KB / MB（保留一位小数）
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
