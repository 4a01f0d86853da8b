//! Behavioural tests for query classification through the public API.

use revns_study::classifier::{QueryKind, RULES, classify, classify_kind};

#[test]
fn test_total_over_odd_input() {
    let inputs = [
        "",
        " ",
        "\u{0}",
        "日本語の質問",
        "🧪🧪🧪",
        "Ünïcödé ÉXPLAIN",
        &"a".repeat(100_000),
    ];
    for s in inputs {
        let p = classify(s);
        assert_eq!(p.max_output_tokens, 5000);
    }
    assert_eq!(classify_kind("日本語の質問"), QueryKind::Default);
    assert_eq!(classify_kind("Ünïcödé ÉXPLAIN"), QueryKind::Explanation);
}

#[test]
fn test_deterministic() {
    for q in ["make flashcards", "why does ice float", "", "banana"] {
        assert_eq!(classify(q), classify(q));
    }
}

#[test]
fn test_case_insensitive() {
    for q in [
        "quiz me",
        "make flashcards",
        "draw a mind map",
        "create timeline",
        "summarize chapter 2",
        "explain osmosis",
        "define entropy",
    ] {
        assert_eq!(classify(q), classify(&q.to_uppercase()), "{q}");
    }
}

#[test]
fn test_priority_order() {
    assert_eq!(classify_kind("quiz me and also explain this"), QueryKind::Quiz);
    // flashcards outranks summary
    assert_eq!(classify_kind("summary flashcards"), QueryKind::Flashcards);
    // timeline outranks explanation
    assert_eq!(classify_kind("explain the history of rome"), QueryKind::Timeline);
    // explanation outranks definition
    assert_eq!(classify_kind("what is it and how does it work"), QueryKind::Explanation);
}

#[test]
fn test_substring_matching() {
    assert_eq!(classify_kind("I have some questions"), QueryKind::Quiz);
    assert_eq!(classify_kind("what is prehistory"), QueryKind::Timeline);
}

#[test]
fn test_default_fallback() {
    assert_eq!(classify_kind(""), QueryKind::Default);
    assert_eq!(classify_kind("   "), QueryKind::Default);
    assert_eq!(classify_kind("banana"), QueryKind::Default);
    assert_eq!(classify("banana").sampling_temperature, 0.3);
}

#[test]
fn test_definition_profile() {
    let p = classify("define entropy");
    assert_eq!(p.kind, QueryKind::Definition);
    assert_eq!(p.sampling_temperature, 0.1);
    assert!(p.instruction_template.contains("focused on providing clear definitions"));
}

#[test]
fn test_keyword_coverage() {
    let samples = [
        ("create quiz", QueryKind::Quiz),
        ("make flashcards", QueryKind::Flashcards),
        ("concept map", QueryKind::Mindmap),
        ("create timeline", QueryKind::Timeline),
        ("key takeaways", QueryKind::Summary),
        ("teach me", QueryKind::Explanation),
        ("meaning of", QueryKind::Definition),
        ("hello there", QueryKind::Default),
    ];
    for (q, kind) in samples {
        assert_eq!(classify_kind(q), kind, "{q}");
    }
}

#[test]
fn test_each_keyword_alone_hits_its_rule_or_an_earlier_one() {
    for (position, (kind, keywords)) in RULES.iter().enumerate() {
        for k in *keywords {
            let got = classify_kind(k);
            let got_position = RULES.iter().position(|(r, _)| *r == got).unwrap();
            assert!(got_position <= position, "'{k}' → {got}, expected {kind} or earlier");
        }
    }
}

#[test]
fn test_structured_templates_pin_json_shape() {
    assert!(QueryKind::Quiz.profile().instruction_template.contains(r#"{ "type": "quiz" }"#));
    assert!(QueryKind::Flashcards.profile().instruction_template.contains(r#"{ "type": "flashcards" }"#));
    assert!(QueryKind::Timeline.profile().instruction_template.contains(r#"{ "type": "timeline" }"#));
    assert!(QueryKind::Mindmap.profile().instruction_template.contains(r#""type": "mindmap""#));
    assert!(QueryKind::Quiz.profile().instruction_template.ends_with("Start response immediately with ["));
    assert!(QueryKind::Mindmap.profile().instruction_template.ends_with("Start response immediately with {"));
}
