use std::{fs, path::Path};

use anyhow::{Context, Result};
use pitch_sysid_core::ExcitationProfiles;
use tracing::info;

/// Loads excitation profiles from `path`, or the stock profiles when absent.
///
/// Schedules missing from the file keep their stock values. The result is
/// validated before it is returned.
pub(crate) fn load_profiles(path: Option<&Path>) -> Result<ExcitationProfiles> {
    let Some(path) = path else {
        return Ok(ExcitationProfiles::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read excitation profiles at {}", path.display()))?;
    let profiles = parse_profiles(&contents)
        .with_context(|| format!("invalid excitation profiles in {}", path.display()))?;

    info!(path = %path.display(), "loaded excitation profiles");
    Ok(profiles)
}

fn parse_profiles(contents: &str) -> Result<ExcitationProfiles> {
    let profiles: ExcitationProfiles =
        toml::from_str(contents).context("failed to parse excitation profiles toml contents")?;
    profiles.validate()?;
    Ok(profiles)
}
