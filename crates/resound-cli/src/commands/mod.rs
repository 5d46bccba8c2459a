//! Command implementations for the resound CLI.

pub mod capture;
pub mod list;
pub mod run;

use resound_harness::RunConfig;

/// Applies the optional directory overrides to the default configuration.
pub(crate) fn build_config(ref_dir: Option<&str>, out_dir: Option<&str>) -> RunConfig {
    let mut config = RunConfig::default();
    if let Some(dir) = ref_dir {
        config.ref_dir = dir.into();
    }
    if let Some(dir) = out_dir {
        config.out_dir = dir.into();
    }
    config
}
