//! WhatsApp 链接生成。
//!
//! 号码输入框只保留数字并显示为 `(DD) NNNNN-NNNN`；消息按行编码后用 `%0A` 拼接，
//! 保证多行消息在 WhatsApp Web 中保持换行。

use super::{encode_uri_component, strip_non_digits};

pub const DEFAULT_COUNTRY_CODE: &str = "55";
pub const COUNTRY_CODE_MAX_LEN: usize = 3;
const BASE_URL: &str = "https://web.whatsapp.com/send/";

/// 号码掩码：区号两位，其余最多 9 位，第 5 位之后加 `-`。
pub fn format_phone(value: &str) -> String {
    let numbers = strip_non_digits(value);
    if numbers.is_empty() {
        return String::new();
    }

    let (ddd, rest) = numbers.split_at(numbers.len().min(2));
    if rest.len() <= 5 {
        format!("({ddd}) {rest}")
    } else {
        let end = rest.len().min(9);
        format!("({ddd}) {}-{}", &rest[..5], &rest[5..end])
    }
}

/// 国家代码只保留数字，最多三位。
pub fn normalize_country_code(value: &str) -> String {
    strip_non_digits(value).chars().take(COUNTRY_CODE_MAX_LEN).collect()
}

/// 逐行编码消息并以 `%0A` 连接。
pub fn encode_message(message: &str) -> String {
    message
        .split('\n')
        .map(encode_uri_component)
        .collect::<Vec<_>>()
        .join("%0A")
}

/// 生成聊天链接。
pub fn build_link(country_code: &str, phone: &str, message: &str) -> String {
    let full_number = format!("{}{}", normalize_country_code(country_code), strip_non_digits(phone));
    format!(
        "{BASE_URL}?phone={full_number}&text={}&type=phone_number&app_absent=0",
        encode_message(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_mask_grows_with_input() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("1"), "(1) ");
        assert_eq!(format_phone("11"), "(11) ");
        assert_eq!(format_phone("1198765"), "(11) 98765");
        assert_eq!(format_phone("11987654"), "(11) 98765-4");
        assert_eq!(format_phone("(11) 98765-43219999"), "(11) 98765-4321");
    }

    #[test]
    fn multiline_message_uses_encoded_newlines() {
        assert_eq!(encode_message("oi\ntudo bem?"), "oi%0Atudo%20bem%3F");
    }

    #[test]
    fn link_contains_country_code_and_digits() {
        let link = build_link("+55", "(11) 98765-4321", "Olá!");
        assert_eq!(
            link,
            "https://web.whatsapp.com/send/?phone=5511987654321&text=Ol%C3%A1!&type=phone_number&app_absent=0"
        );
    }

    #[test]
    fn country_code_is_truncated() {
        assert_eq!(normalize_country_code("+1-2345"), "123");
    }
}
