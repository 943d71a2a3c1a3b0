use crate::error::TurnResult;
use crate::geometry::{profile_model, reader_for, Backend, Capabilities};
use crate::params::TurnParams;
use crate::postprocessor::post_process_fanuc;
use crate::program::generate_program;
use crate::types::CylinderProfile;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Profile the model at `path` with the reader selected for `backend`.
pub fn profile_from_model(path: &Path, backend: Backend) -> TurnResult<CylinderProfile> {
    let reader = reader_for(backend, Capabilities::detect())?;
    Ok(profile_model(path, reader.as_ref())?)
}

/// Model file → NC program text.
pub fn nc_from_model(path: &Path, params: &TurnParams, backend: Backend) -> TurnResult<String> {
    let profile = profile_from_model(path, backend)?;
    nc_from_profile(&profile, params)
}

/// Profile → NC program text.
pub fn nc_from_profile(profile: &CylinderProfile, params: &TurnParams) -> TurnResult<String> {
    let program = generate_program(profile, params)?;
    Ok(post_process_fanuc(&program).to_text())
}

/// `<stem>_turn.NC` next to the model.
pub fn default_output_path(model: &Path) -> PathBuf {
    let stem = model
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "part".to_string());
    model.with_file_name(format!("{stem}_turn.NC"))
}

pub fn save_nc<P: AsRef<Path>>(text: &str, path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, text).with_context(|| format!("write NC program {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/parts/1/1.stp")),
            PathBuf::from("/parts/1/1_turn.NC")
        );
        assert_eq!(
            default_output_path(Path::new("shaft.step")),
            PathBuf::from("shaft_turn.NC")
        );
    }
}
