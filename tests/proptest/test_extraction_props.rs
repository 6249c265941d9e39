//! Property-based tests for shell block extraction

use proptest::prelude::*;
use runmd::markdown::extract_shell_blocks;

/// A fenced block: (language, body line, is shell)
fn fence() -> impl Strategy<Value = (String, String, bool)> {
    let languages = prop::sample::select(vec![
        ("sh", true),
        ("bash", true),
        ("shell", true),
        ("zsh", true),
        ("BASH", true),
        ("python", false),
        ("javascript", false),
        ("json", false),
        ("", false),
    ]);
    (languages, "[a-z][a-z0-9 ]{0,30}")
        .prop_map(|((lang, shell), body)| (lang.to_string(), body, shell))
}

fn document(fences: &[(String, String, bool)]) -> String {
    let mut doc = String::from("# Generated\n\n");
    for (i, (lang, body, _)) in fences.iter().enumerate() {
        doc.push_str(&format!("Paragraph {}.\n\n```{}\n{}\n```\n\n", i, lang, body));
    }
    doc
}

proptest! {
    #[test]
    fn test_only_shell_blocks_are_extracted_in_order(fences in prop::collection::vec(fence(), 0..12)) {
        let blocks = extract_shell_blocks(&document(&fences));
        let expected: Vec<(String, String)> = fences
            .iter()
            .filter(|(_, _, shell)| *shell)
            .map(|(lang, body, _)| (lang.to_lowercase(), body.clone()))
            .collect();

        prop_assert_eq!(blocks.len(), expected.len());
        for (i, block) in blocks.iter().enumerate() {
            prop_assert_eq!(block.index, i);
            prop_assert_eq!(&block.language, &expected[i].0);
            prop_assert_eq!(&block.source, &expected[i].1);
        }
    }

    #[test]
    fn test_extraction_never_panics(text in "\\PC{0,500}") {
        let blocks = extract_shell_blocks(&text);
        for (i, block) in blocks.iter().enumerate() {
            prop_assert_eq!(block.index, i);
        }
    }
}
