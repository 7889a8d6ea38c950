//! Environment source: PREGEN__SECTION__KEY overrides, e.g. PREGEN__SCHEDULER__BATCH_SIZE=64.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("PREGEN")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
