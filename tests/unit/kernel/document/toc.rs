use super::*;

#[test]
fn extracts_headings_in_order() {
    let src = "# Title\ntext\n## First Part\n###### Deep\n####### too deep\n#nospace";
    let items = generate(src);
    assert_eq!(
        items,
        vec![
            TocItem {
                id: "title".to_string(),
                text: "Title".to_string(),
                level: 1
            },
            TocItem {
                id: "first-part".to_string(),
                text: "First Part".to_string(),
                level: 2
            },
            TocItem {
                id: "deep".to_string(),
                text: "Deep".to_string(),
                level: 6
            },
        ]
    );
}

#[test]
fn skips_headings_inside_fences() {
    let src = "# Real\n```sh\n# comment\n```\n## After";
    let texts: Vec<_> = generate(src).into_iter().map(|i| i.text).collect();
    assert_eq!(texts, vec!["Real", "After"]);
}

#[test]
fn slug_rules() {
    assert_eq!(slugify("  Hello   World  "), "hello-world");
    assert_eq!(slugify("What's new? (v2.0)"), "whats-new-v20");
    assert_eq!(slugify("snake_case-name"), "snake_case-name");
    assert_eq!(slugify("日本語 テスト"), "日本語-テスト");
    assert_eq!(slugify("Ünïcode"), "ncode");
}

#[test]
fn closing_hashes_are_stripped() {
    assert_eq!(strip_closing_hashes("Title ##"), "Title");
    assert_eq!(strip_closing_hashes("C#"), "C#");
    assert_eq!(strip_closing_hashes("##"), "");
}
