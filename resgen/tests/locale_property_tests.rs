use proptest::prelude::*;
use resgen::{
    Locale,
    locale::{derive_from_filename, strip_locale_suffix},
    placeholder::{ParamKind, infer},
};

fn locale_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::string::string_regex("[a-z]{2,3}").expect("valid language regex"),
        proptest::string::string_regex("[a-z]{2}_[A-Z]{2}").expect("valid country regex"),
        proptest::string::string_regex("[a-z]{2}_[A-Z]{2}_[A-Za-z0-9]{1,8}")
            .expect("valid variant regex"),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_locale_round_trip(text in locale_strategy()) {
        let locale = Locale::parse(&text).unwrap();
        prop_assert_eq!(locale.to_string(), text.clone());
        let reparsed: Locale = locale.to_string().parse().unwrap();
        prop_assert_eq!(reparsed, locale);
    }

    #[test]
    fn prop_file_name_locale(
        package in "[a-z]{1,8}",
        class in "[A-Z][a-zA-Z]{0,12}",
        text in "[a-z]{2}_[A-Z]{2}",
    ) {
        let file = format!("{}/{}_{}.properties", package, class, text);
        prop_assert_eq!(
            derive_from_filename(&file, ".properties").map(|l| l.to_string()),
            Some(text.clone())
        );
        prop_assert_eq!(
            strip_locale_suffix(&file, ".properties"),
            format!("{}/{}", package, class)
        );
    }

    #[test]
    fn prop_signature_length_follows_highest_placeholder(max in 0usize..20) {
        let text = format!("value {{{}}}", max);
        let signature = infer(&text);
        prop_assert_eq!(signature.len(), max + 1);
        prop_assert!(signature.kinds().iter().all(|k| *k == ParamKind::String));
    }
}

#[test]
fn test_inference_examples() {
    assert_eq!(
        infer("Hello {0}, you are {1,number} years old").kinds(),
        &[ParamKind::String, ParamKind::Number]
    );
    assert_eq!(infer("{2}").len(), 3);
    assert!(infer("no placeholders").is_empty());
    assert_eq!(
        infer("Born {0,date}, at {1, time}, {2,choice,0#none|1#one}").kinds(),
        &[ParamKind::Date, ParamKind::Time, ParamKind::String]
    );
}
