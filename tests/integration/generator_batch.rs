//! Batch generation: seeds, continuations, parameters and failure isolation

use infiniprompt::config::GeneratorConfig;
use infiniprompt::generator::{derive_output_seed, GenerateRequest, Generator};
use infiniprompt::{generate, PromptError, Template};

fn story() -> Template {
    Template::new("{$:hero} goes to {place}. {optional:last_output|}")
        .with_data("hero", vec!["Ann", "Bo", "Cy"])
        .with_data("place", vec!["the sea", "the hills", "town"])
}

#[test]
fn same_seed_reproduces_outputs_and_tracked() {
    let template = Template::new("{track:t|{one_of:a|b|c}} {maybe:50|x}");
    let request = GenerateRequest::new().with_seed(2024).with_prompts(8);
    let first = generate(&template, &request).unwrap();
    let second = generate(&template, &request).unwrap();
    let a: Vec<_> = first.outputs().map(|p| (&p.output, &p.tracked)).collect();
    let b: Vec<_> = second.outputs().map(|p| (&p.output, &p.tracked)).collect();
    assert_eq!(a, b);
}

#[test]
fn output_seeds_are_derived_from_position() {
    let template = story();
    let batch = generate(
        &template,
        &GenerateRequest::new()
            .with_seed(99)
            .with_prompts(2)
            .with_continues(1),
    )
    .unwrap();
    assert_eq!(batch.seed, 99);
    for (index, prompt) in batch.outputs().enumerate() {
        assert_eq!(prompt.seed, derive_output_seed(99, index as u64));
    }
}

#[test]
fn continuation_chains_stay_within_their_prompt() {
    let template = story();
    let batch = generate(
        &template,
        &GenerateRequest::new()
            .with_seed(5)
            .with_prompts(2)
            .with_continues(2),
    )
    .unwrap();
    let outputs: Vec<_> = batch.outputs().collect();
    assert_eq!(outputs.len(), 6);

    for chain in outputs.chunks(3) {
        assert!(!chain[0].parameters.contains_key("last_output"));
        for pair in chain.windows(2) {
            assert_eq!(pair[1].parameters["last_output"], pair[0].output);
            assert_eq!(pair[1].parameters["last_hero"], pair[0].statics["hero"]);
            assert!(pair[1].output.ends_with(&pair[0].output));
        }
    }
}

#[test]
fn extra_parameters_override_template_data() {
    let template = Template::new("{place} / {meta_place}").with_data("place", "home");
    let batch = generate(
        &template,
        &GenerateRequest::new().with_parameter("place", "Mars"),
    )
    .unwrap();
    let prompt = batch.outputs().next().unwrap();
    assert_eq!(prompt.output, "Mars / Mars");
    assert_eq!(prompt.parameters["place"], "Mars");
}

#[test]
fn follow_list_rotates_current_value() {
    let template = Template::new("Visit {current_city}.");
    let batch = generate(
        &template,
        &GenerateRequest::new()
            .with_seed(1)
            .with_prompts(3)
            .with_parameter("follow-list-of-city", "Oslo\nRome"),
    )
    .unwrap();
    let outputs: Vec<_> = batch.outputs().map(|p| p.output.as_str()).collect();
    assert_eq!(outputs, vec!["Visit Oslo.", "Visit Rome.", "Visit Oslo."]);
}

#[test]
fn enhance_is_accepted_and_ignored() {
    let template = story();
    let plain = GenerateRequest::new().with_seed(3);
    let enhanced = plain.clone().with_enhance(true);
    let a = generate(&template, &plain).unwrap();
    let b = generate(&template, &enhanced).unwrap();
    assert_eq!(
        a.outputs().next().unwrap().output,
        b.outputs().next().unwrap().output
    );
}

#[test]
fn one_failure_does_not_abort_siblings() {
    let template = Template::new("{@:coin} {@:coin} {@:coin}").with_data("coin", vec!["h", "t"]);
    let batch = generate(
        &template,
        &GenerateRequest::new().with_seed(1).with_prompts(3),
    )
    .unwrap();
    assert_eq!(batch.len(), 3);
    assert_eq!(batch.failures().count(), 3);

    let mixed = Template::new("{==:pass_number|0|ok|{error:pass_number|1}}");
    let batch = generate(&mixed, &GenerateRequest::new().with_continues(2)).unwrap();
    let failed: Vec<usize> = batch.failures().map(|(i, _)| i).collect();
    assert_eq!(failed, vec![1]);
    let (_, err) = batch.failures().next().unwrap();
    assert!(matches!(err.root_cause(), PromptError::UserTriggered { .. }));
}

#[test]
fn depth_limit_comes_from_configuration() {
    let template = Template::new("{a}")
        .with_logic("a", "{b}")
        .with_logic("b", "{c}")
        .with_logic("c", "deep");
    let shallow = GeneratorConfig {
        max_depth: 2,
        ..GeneratorConfig::default()
    };
    let generator = Generator::new(&template, shallow).unwrap();
    let batch = generator.generate(&GenerateRequest::new()).unwrap();
    let (_, err) = batch.failures().next().unwrap();
    assert!(matches!(err.root_cause(), PromptError::RecursionLimit(2)));

    let generator = Generator::new(&template, GeneratorConfig::default()).unwrap();
    let batch = generator.generate(&GenerateRequest::new()).unwrap();
    assert_eq!(batch.outputs().next().unwrap().output, "deep");
}

#[test]
fn repeat_limit_comes_from_configuration() {
    let template = Template::new("{repeat:5|ha}");
    let config = GeneratorConfig {
        max_repeat: 4,
        ..GeneratorConfig::default()
    };
    let generator = Generator::new(&template, config).unwrap();
    let batch = generator.generate(&GenerateRequest::new()).unwrap();
    let (_, err) = batch.failures().next().unwrap();
    assert!(matches!(
        err.root_cause(),
        PromptError::RepeatLimit { count: 5, max: 4 }
    ));
}
