//! Base64 文本编解码。
//!
//! 编码：UTF-8 字节的标准 Base64（带填充）。
//! 解码：忽略 ASCII 空白，填充可有可无，结果必须是合法 UTF-8。

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{Engine as _, engine::general_purpose};

use super::TextToolError;

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// 编解码方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Encode,
    Decode,
}

pub fn encode_text(text: &str) -> String {
    general_purpose::STANDARD.encode(text.as_bytes())
}

pub fn decode_text(encoded: &str) -> Result<String, TextToolError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = LENIENT
        .decode(compact.as_bytes())
        .map_err(|e| TextToolError::InvalidBase64(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| TextToolError::InvalidUtf8)
}

pub fn process(mode: Mode, input: &str) -> Result<String, TextToolError> {
    match mode {
        Mode::Encode => Ok(encode_text(input)),
        Mode::Decode => decode_text(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cafe_round_trips() {
        let encoded = encode_text("café");
        assert_eq!(encoded, "Y2Fmw6k=");
        assert_eq!(decode_text(&encoded).expect("decode"), "café");
    }

    #[test]
    fn decode_tolerates_whitespace_and_missing_padding() {
        assert_eq!(decode_text("Y2Fm\nw6k").expect("decode"), "café");
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(matches!(decode_text("@@@"), Err(TextToolError::InvalidBase64(_))));
        // 0xFF 0xFE 不是合法 UTF-8
        assert_eq!(decode_text("//4="), Err(TextToolError::InvalidUtf8));
    }

    #[test]
    fn process_dispatches_on_mode() {
        assert_eq!(process(Mode::Encode, "oi").expect("encode"), "b2k=");
        assert_eq!(process(Mode::Decode, "b2k=").expect("decode"), "oi");
    }
}
