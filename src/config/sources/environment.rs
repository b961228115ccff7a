//! Environment source: INFINIPROMPT__SECTION__KEY, e.g. INFINIPROMPT__GENERATOR__MAX_DEPTH.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const PREFIX: &str = "INFINIPROMPT";

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(PREFIX)
            .separator("__")
            .try_parsing(true),
    )
}
