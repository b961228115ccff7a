//! Per-output state: statics, exclusives and tracking never leak between outputs

use super::test_utils::render_one;
use infiniprompt::generator::GenerateRequest;
use infiniprompt::{generate, PromptError, Template};
use std::collections::{BTreeSet, HashSet};

fn pets() -> Template {
    Template::new("x").with_data("pet", vec!["cat", "dog", "owl"])
}

#[test]
fn static_is_consistent_within_an_output() {
    let mut template = pets();
    template.entrypoint = "{$:pet} and {$:pet} and {$:pet}".into();
    for seed in 0..25 {
        let prompt = render_one(&template, seed);
        let words: BTreeSet<&str> = prompt.output.split(" and ").collect();
        assert_eq!(words.len(), 1, "{}", prompt.output);
        assert_eq!(prompt.statics["pet"], *words.iter().next().unwrap());
    }
}

#[test]
fn statics_are_redrawn_per_output() {
    let mut template = pets();
    template.entrypoint = "{$:pet}".into();
    let batch = generate(
        &template,
        &GenerateRequest::new().with_seed(77).with_prompts(40),
    )
    .unwrap();
    let seen: HashSet<String> = batch.outputs().map(|p| p.output.clone()).collect();
    assert!(seen.len() > 1);
}

#[test]
fn exclusive_exhausts_after_every_value() {
    let mut template = pets();
    template.entrypoint = "{@:pet} {@:pet} {@:pet}".into();
    for seed in 0..15 {
        let prompt = render_one(&template, seed);
        let words: HashSet<&str> = prompt.output.split(' ').collect();
        assert_eq!(words.len(), 3);
    }

    template.entrypoint = "{@:pet} {@:pet} {@:pet} {@:pet}".into();
    let batch = generate(&template, &GenerateRequest::new().with_seed(1)).unwrap();
    let (_, err) = batch.failures().next().unwrap();
    assert!(matches!(
        err.root_cause(),
        PromptError::ExclusiveExhausted { key } if key == "pet"
    ));
}

#[test]
fn exclusive_state_resets_between_outputs() {
    let mut template = pets();
    template.entrypoint = "{@:pet} {@:pet} {@:pet}".into();
    let batch = generate(
        &template,
        &GenerateRequest::new().with_seed(8).with_prompts(5),
    )
    .unwrap();
    assert_eq!(batch.failures().count(), 0);
    assert_eq!(batch.outputs().count(), 5);
}

#[test]
fn track_captures_last_write() {
    let template = Template::new("{track:who|Ann} met {tk:who|Bo}.");
    let prompt = render_one(&template, 0);
    assert_eq!(prompt.output, "Ann met Bo.");
    assert_eq!(prompt.tracked["who"], "Bo");
}

#[test]
fn tracked_value_is_readable_later_in_the_output() {
    let template = Template::new("{ignore:{track:pick|{$:pet}}}I saw a {track_pick}.")
        .with_data("pet", vec!["cat", "dog"]);
    for seed in 0..10 {
        let prompt = render_one(&template, seed);
        assert_eq!(prompt.output, format!("I saw a {}.", prompt.tracked["pick"]));
    }
}

#[test]
fn scoped_exclusives_draw_independently() {
    let template = Template::new("{a@:pet} {a@:pet} {a@:pet} {b@:pet}")
        .with_data("pet", vec!["cat", "dog", "owl"]);
    for seed in 0..10 {
        let output = render_one(&template, seed).output;
        assert_eq!(output.split(' ').count(), 4);
    }
}
