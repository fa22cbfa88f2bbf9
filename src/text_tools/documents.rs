//! # CPF / CNPJ 生成与校验
//!
//! ## 设计思路
//!
//! 两种证件号都由随机前缀 + 两位校验位组成，区别只在前缀长度、权重与格式掩码，
//! 因此用 `DocumentKind` 描述差异，生成/校验/格式化共用同一套逻辑。
//!
//! ## 实现思路
//!
//! 校验位：`d = Σ(nᵢ·wᵢ) mod 11`，`d < 2` 取 0，否则取 `11 - d`。
//! 第二位校验位的计算包含第一位校验位。

use rand::Rng;

use super::strip_non_digits;

const CPF_FIRST_WEIGHTS: [u32; 9] = [10, 9, 8, 7, 6, 5, 4, 3, 2];
const CPF_SECOND_WEIGHTS: [u32; 10] = [11, 10, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// 证件类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Cpf,
    Cnpj,
}

impl DocumentKind {
    /// 随机前缀位数。
    pub fn base_len(self) -> usize {
        match self {
            Self::Cpf => 9,
            Self::Cnpj => 12,
        }
    }

    /// 完整号码位数。
    pub fn digit_count(self) -> usize {
        self.base_len() + 2
    }

    fn weights(self) -> (&'static [u32], &'static [u32]) {
        match self {
            Self::Cpf => (&CPF_FIRST_WEIGHTS, &CPF_SECOND_WEIGHTS),
            Self::Cnpj => (&CNPJ_FIRST_WEIGHTS, &CNPJ_SECOND_WEIGHTS),
        }
    }

    /// 每段位数与段后分隔符。
    fn mask(self) -> &'static [(usize, Option<char>)] {
        match self {
            Self::Cpf => &[(3, Some('.')), (3, Some('.')), (3, Some('-')), (2, None)],
            Self::Cnpj => &[
                (2, Some('.')),
                (3, Some('.')),
                (3, Some('/')),
                (4, Some('-')),
                (2, None),
            ],
        }
    }
}

/// 按权重计算一位校验位。
pub fn check_digit(digits: &[u8], weights: &[u32]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(&d, &w)| d as u32 * w)
        .sum();
    let rest = sum % 11;
    if rest < 2 { 0 } else { (11 - rest) as u8 }
}

/// 由前缀补全两位校验位。
pub fn complete(kind: DocumentKind, base: &[u8]) -> Vec<u8> {
    let (first, second) = kind.weights();
    let mut digits = base.to_vec();
    digits.push(check_digit(&digits, first));
    digits.push(check_digit(&digits, second));
    digits
}

/// 用给定随机源生成未格式化的号码。
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, kind: DocumentKind) -> String {
    let base: Vec<u8> = (0..kind.base_len()).map(|_| rng.gen_range(0..10)).collect();
    to_string(&complete(kind, &base))
}

/// 生成号码，`formatted` 为真时带掩码。
pub fn generate(kind: DocumentKind, formatted: bool) -> String {
    let digits = generate_with(&mut rand::thread_rng(), kind);
    if formatted { format(kind, &digits) } else { digits }
}

/// 逐步套用掩码：只在下一段已有数字时插入分隔符，超出长度的数字被截断。
pub fn format(kind: DocumentKind, value: &str) -> String {
    let digits: String = strip_non_digits(value).chars().take(kind.digit_count()).collect();
    let mut out = String::with_capacity(digits.len() + 4);
    let mut rest = digits.as_str();

    for &(size, separator) in kind.mask() {
        if rest.is_empty() {
            break;
        }
        let take = size.min(rest.len());
        out.push_str(&rest[..take]);
        rest = &rest[take..];
        if let Some(sep) = separator {
            if !rest.is_empty() {
                out.push(sep);
            }
        }
    }
    out
}

pub fn format_cpf(value: &str) -> String {
    format(DocumentKind::Cpf, value)
}

pub fn format_cnpj(value: &str) -> String {
    format(DocumentKind::Cnpj, value)
}

/// 输入框内容规范化：去掉非数字、截断长度，按开关决定是否套用掩码。
pub fn normalize_input(kind: DocumentKind, value: &str, formatted: bool) -> String {
    let digits: String = strip_non_digits(value).chars().take(kind.digit_count()).collect();
    if formatted { format(kind, &digits) } else { digits }
}

/// 校验号码（允许带掩码）：长度正确且两位校验位与前缀重新计算的一致。
pub fn is_valid(kind: DocumentKind, value: &str) -> bool {
    let digits: Vec<u8> = strip_non_digits(value).bytes().map(|b| b - b'0').collect();
    if digits.len() != kind.digit_count() {
        return false;
    }
    complete(kind, &digits[..kind.base_len()]) == digits
}

pub fn is_valid_cpf(value: &str) -> bool {
    is_valid(DocumentKind::Cpf, value)
}

pub fn is_valid_cnpj(value: &str) -> bool {
    is_valid(DocumentKind::Cnpj, value)
}

fn to_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_cpf_check_digits() {
        // 111.444.777-35
        assert_eq!(complete(DocumentKind::Cpf, &[1, 1, 1, 4, 4, 4, 7, 7, 7]), vec![
            1, 1, 1, 4, 4, 4, 7, 7, 7, 3, 5
        ]);
        assert!(is_valid_cpf("111.444.777-35"));
        assert!(!is_valid_cpf("111.444.777-36"));
    }

    #[test]
    fn known_cnpj_check_digits() {
        assert!(is_valid_cnpj("11.222.333/0001-81"));
        assert!(!is_valid_cnpj("11.222.333/0001-80"));
        assert!(!is_valid_cnpj("11.222.333/0001"));
    }

    #[test]
    fn remainder_below_two_yields_zero() {
        // 全零前缀：和为 0，余数 0
        assert_eq!(check_digit(&[0; 9], &CPF_FIRST_WEIGHTS), 0);
    }

    #[test]
    fn masks_apply_progressively() {
        assert_eq!(format_cpf("123"), "123");
        assert_eq!(format_cpf("1234"), "123.4");
        assert_eq!(format_cpf("1234567890"), "123.456.789-0");
        assert_eq!(format_cpf("123456789012345"), "123.456.789-01");
        assert_eq!(format_cnpj("11222333000181"), "11.222.333/0001-81");
        assert_eq!(format_cnpj("112223"), "11.222.3");
    }

    #[test]
    fn normalize_input_respects_format_toggle() {
        assert_eq!(normalize_input(DocumentKind::Cpf, "111.444.777-35", false), "11144477735");
        assert_eq!(normalize_input(DocumentKind::Cnpj, "abc11222", true), "11.222");
    }

    #[test]
    fn generated_numbers_have_expected_shape() {
        let cpf = generate(DocumentKind::Cpf, true);
        assert_eq!(cpf.len(), 14);
        assert!(is_valid_cpf(&cpf));

        let cnpj = generate(DocumentKind::Cnpj, false);
        assert_eq!(cnpj.len(), 14);
        assert!(cnpj.chars().all(|c| c.is_ascii_digit()));
        assert!(is_valid_cnpj(&cnpj));
    }
}
