//! End-to-end template scenarios through the public generate entry point

use super::test_utils::render_one;
use infiniprompt::generator::{GenerateRequest, GeneratorConfig};
use infiniprompt::{generate, Generator, PromptError, Template};

fn first_error(template: &Template) -> PromptError {
    let batch = generate(template, &GenerateRequest::new().with_seed(1)).unwrap();
    match batch.results.into_iter().next().unwrap() {
        Err(e) => e,
        Ok(prompt) => panic!("expected failure, got '{}'", prompt.output),
    }
}

#[test]
fn optional_falls_back_to_default() {
    let template = Template::new("Hello {optional:name|World}");
    assert_eq!(render_one(&template, 1).output, "Hello World");

    let template = template.with_data("name", "Ann");
    assert_eq!(render_one(&template, 1).output, "Hello Ann");
}

#[test]
fn numeric_comparison_selects_branch() {
    let adult = Template::new("{>:age|18|Adult|Minor}").with_data("age", "20");
    assert_eq!(render_one(&adult, 4).output, "Adult");

    let minor = Template::new("{>:age|18|Adult|Minor}").with_data("age", "10");
    assert_eq!(render_one(&minor, 4).output, "Minor");

    let broken = Template::new("{>:age|18|Adult|Minor}").with_data("age", "abc");
    assert!(matches!(
        first_error(&broken).root_cause(),
        PromptError::NumericParse { .. }
    ));
}

#[test]
fn indirection_through_nested_key() {
    let template = Template::new("{*:{animal_key}}")
        .with_data("animal_key", "dog")
        .with_data("dog", "a cute puppy");
    assert_eq!(render_one(&template, 0).output, "a cute puppy");
}

#[test]
fn lazy_branch_never_tracks_or_errors() {
    let template = Template::new("{==:status|active|{track:t|X}|{error:status|active}}")
        .with_data("status", "inactive");
    for seed in 0..10 {
        let prompt = render_one(&template, seed);
        assert_eq!(prompt.output, "");
        assert!(!prompt.tracked.contains_key("t"));
    }
}

#[test]
fn literal_text_survives_untouched() {
    let template = Template::new("{#:This is a literal string}");
    assert_eq!(render_one(&template, 3).output, "This is a literal string");

    let braces = Template::new("Use {#:{name}} as a placeholder");
    assert_eq!(render_one(&braces, 3).output, "Use {name} as a placeholder");
}

#[test]
fn cleanup_still_normalizes_literal_spacing() {
    let template = Template::new("{#:a  b :c}");
    assert_eq!(render_one(&template, 3).output, "a b:c");

    let generator = Generator::new(
        &template,
        GeneratorConfig {
            cleanup: false,
            ..GeneratorConfig::default()
        },
    )
    .unwrap();
    let rendered = generator.render(3, &Default::default()).unwrap();
    assert_eq!(rendered.output, "a  b :c");
}

#[test]
fn maybe_boundaries_hold_for_every_seed() {
    let never = Template::new("a{maybe:0|X}b");
    let always = Template::new("a{maybe:100|X}b");
    for seed in 0..50 {
        assert_eq!(render_one(&never, seed).output, "ab");
        assert_eq!(render_one(&always, seed).output, "aXb");
    }
}

#[test]
fn logic_templates_compose_with_data() {
    let template = Template::new("{intro} {closing}")
        .with_data("name", "Ann")
        .with_data("mood", vec!["happy", "calm"])
        .with_logic("intro", "{name} feels {$:mood}.")
        .with_logic("closing", "Still {$:mood}.");
    for seed in 0..10 {
        let output = render_one(&template, seed).output;
        let mood = if output.contains("happy") { "happy" } else { "calm" };
        assert_eq!(output, format!("Ann feels {mood}. Still {mood}."));
    }
}

#[test]
fn postprocess_rules_rewrite_output() {
    let template = Template::new("a  Cat sat , then left .")
        .with_postprocess(r"\bcat\b", "dog")
        .with_postprocess(r"(\w+) sat", "{1} stood");
    assert_eq!(render_one(&template, 0).output, "a dog stood, then left.");
}

#[test]
fn preprocessed_text_drives_captures_and_branches() {
    let template = Template::from_json_str(
        r#"{
            "entrypoint": "{==:meta_regex_mood|sad|A gloomy portrait|A portrait} of {optional:meta_regex_subject|someone}",
            "preprocess": [{ "pattern": "unhappy", "replacement": "sad" }],
            "regex": { "mood": "(\\w+) (?:\\w+)", "subject": "\\w+ (\\w+)" }
        }"#,
    )
    .unwrap();
    let render = |text: &str| {
        let request = GenerateRequest::new()
            .with_seed(1)
            .with_parameter("text", text);
        let batch = generate(&template, &request).unwrap();
        let output = batch.outputs().next().unwrap().output.clone();
        output
    };
    assert_eq!(render("Unhappy clown"), "A gloomy portrait of clown");
    assert_eq!(render("happy dog"), "A portrait of dog");
}

#[test]
fn tree_of_tags_entrypoint_from_json() {
    let template = Template::from_json_str(
        r#"{
            "entrypoint": {
                "text": "a photo.",
                "outdoor": {
                    "text": "in an outdoor location,",
                    "cat": { "text": "a {size} cat" }
                }
            },
            "data": { "size": "small" }
        }"#,
    )
    .unwrap();
    let request = GenerateRequest::new().with_parameter("tags_path", "outdoor/cat\noutdoor\n\n");
    let batch = generate(&template, &request).unwrap();
    assert_eq!(
        batch.outputs().next().unwrap().output,
        "a small cat in an outdoor location,"
    );

    let request = GenerateRequest::new().with_parameter("tags_path", "indoor/dog");
    let batch = generate(&template, &request).unwrap();
    assert_eq!(batch.outputs().next().unwrap().output, "a photo.");
}

#[test]
fn template_json_round_trip() {
    let template = Template::from_json_str(
        r#"{
            "entrypoint": [["A", "A"], ["{color} fox"]],
            "data": { "color": ["red", 7, true] },
            "logic": {}
        }"#,
    )
    .unwrap();
    for seed in 0..10 {
        let output = render_one(&template, seed).output;
        assert!(
            ["A red fox", "A 7 fox", "A true fox"].contains(&output.as_str()),
            "{output}"
        );
    }
}

#[test]
fn unbalanced_template_is_rejected_before_generation() {
    let template = Template::new("fine").with_data("broken", "{oops");
    let err = generate(&template, &GenerateRequest::new()).unwrap_err();
    assert!(matches!(err, PromptError::MalformedTemplate { .. }));
}

#[test]
fn unknown_operator_names_the_token() {
    let err = first_error(&Template::new("before {frobnicate:x} after"));
    assert!(matches!(
        err.root_cause(),
        PromptError::UnrecognizedOperator(token) if token == "frobnicate"
    ));
    assert_eq!(err.expression(), Some("{frobnicate:x}"));
}
