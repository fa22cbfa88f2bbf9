//! Lorem Ipsum 生成。
//!
//! 每次生成 N 个从固定词表中均匀抽取的单词，首字母大写并以 `". "` 结尾；
//! “继续生成”把新段落接在已有文本之后。

use std::ops::RangeInclusive;

use rand::Rng;

use super::TextToolError;

pub const VOCABULARY: [&str; 12] = [
    "lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "nulla",
    "magna",
    "aliquam",
    "erat",
];

pub const WORD_COUNT_RANGE: RangeInclusive<usize> = 1..=500;
pub const DEFAULT_WORD_COUNT: usize = 50;

pub fn validate_word_count(count: usize) -> Result<usize, TextToolError> {
    if count < *WORD_COUNT_RANGE.start() {
        return Err(TextToolError::WordCountTooLow);
    }
    if count > *WORD_COUNT_RANGE.end() {
        return Err(TextToolError::WordCountTooHigh {
            max: *WORD_COUNT_RANGE.end(),
        });
    }
    Ok(count)
}

/// 使用给定随机源生成一段文本。
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Result<String, TextToolError> {
    let count = validate_word_count(count)?;

    let words: Vec<&str> = (0..count)
        .map(|_| VOCABULARY[rng.gen_range(0..VOCABULARY.len())])
        .collect();

    let mut text = capitalize_first(&words.join(" "));
    text.push_str(". ");
    Ok(text)
}

pub fn generate(count: usize) -> Result<String, TextToolError> {
    generate_with(&mut rand::thread_rng(), count)
}

/// 在已有文本后追加一段新文本。
pub fn generate_more(existing: &str, count: usize) -> Result<String, TextToolError> {
    let next = generate(count)?;
    Ok(format!("{existing}{next}"))
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
