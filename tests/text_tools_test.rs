// 文本工具的性质测试
use dev_tools::text_tools::base64_codec::{Mode, decode_text, encode_text, process};
use dev_tools::text_tools::documents::{self, DocumentKind};
use dev_tools::text_tools::{lorem, whatsapp};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

proptest! {
    #[test]
    fn base64_round_trips_any_text(text in ".*") {
        let encoded = encode_text(&text);
        prop_assert_eq!(decode_text(&encoded).expect("decode"), text.clone());
        prop_assert_eq!(process(Mode::Decode, &process(Mode::Encode, &text).expect("encode")).expect("decode"), text);
    }

    #[test]
    fn generated_documents_are_valid(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        for kind in [DocumentKind::Cpf, DocumentKind::Cnpj] {
            let digits = documents::generate_with(&mut rng, kind);
            prop_assert_eq!(digits.len(), kind.digit_count());
            prop_assert!(documents::is_valid(kind, &digits));
            prop_assert!(documents::is_valid(kind, &documents::format(kind, &digits)));
        }
    }

    #[test]
    fn wrong_last_check_digit_is_invalid(seed in any::<u64>(), bump in 1u8..10) {
        let mut rng = StdRng::seed_from_u64(seed);
        let digits = documents::generate_with(&mut rng, DocumentKind::Cpf);
        let (head, last) = digits.split_at(digits.len() - 1);
        let last = last.as_bytes()[0] - b'0';
        let tampered = format!("{}{}", head, (last + bump) % 10);
        prop_assert!(!documents::is_valid_cpf(&tampered));
    }

    #[test]
    fn lorem_has_requested_word_count(seed in any::<u64>(), count in 1usize..=500) {
        let mut rng = StdRng::seed_from_u64(seed);
        let text = lorem::generate_with(&mut rng, count).expect("valid count");
        prop_assert_eq!(text.split_whitespace().count(), count);
        prop_assert!(text.ends_with(". "));
    }

    #[test]
    fn whatsapp_link_only_carries_digits_in_phone(phone in "[0-9 ()+-]{0,20}") {
        let link = whatsapp::build_link("+55", &phone, "oi");
        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        let expected = format!("?phone=55{}&text=oi&", digits);
        prop_assert!(link.contains(&expected));
    }
}

#[test]
fn known_documents_validate() {
    assert!(documents::is_valid_cpf("111.444.777-35"));
    assert!(documents::is_valid_cnpj("11.222.333/0001-81"));
    assert!(!documents::is_valid_cpf("111.444.777-36"));
    assert!(!documents::is_valid_cnpj("11.222.333/0001"));
}

#[test]
fn multiline_message_is_joined_with_encoded_newline() {
    assert_eq!(
        whatsapp::build_link("55", "(11) 98765-4321", "Olá\nmundo"),
        "https://web.whatsapp.com/send/?phone=5511987654321&text=Ol%C3%A1%0Amundo&type=phone_number&app_absent=0"
    );
}

#[test]
fn lorem_rejects_out_of_range_counts() {
    assert!(lorem::generate(0).is_err());
    assert!(lorem::generate(501).is_err());
}
