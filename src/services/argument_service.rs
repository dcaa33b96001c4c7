use crate::models::RenderRequest;
use crate::utils::ValidationError;

/// Build the capture-website flag list for a validated request.
///
/// Order is fixed: `--height`, `--width`, `--delay`, `--overwrite`,
/// `--dark-mode`, `--output`. Zero sizes/delay and false flags are omitted.
/// The input source is not part of the list; inline markup goes over stdin.
pub fn build_arguments(request: &RenderRequest) -> Result<Vec<String>, ValidationError> {
    if request.output.is_empty() {
        return Err(ValidationError::MissingOutput);
    }

    let mut args = Vec::new();

    if request.height != 0 {
        args.push("--height".to_string());
        args.push(request.height.to_string());
    }

    if request.width != 0 {
        args.push("--width".to_string());
        args.push(request.width.to_string());
    }

    if request.delay != 0 {
        args.push("--delay".to_string());
        args.push(request.delay.to_string());
    }

    if request.overwrite {
        args.push("--overwrite".to_string());
    }

    if request.dark_mode {
        args.push("--dark-mode".to_string());
    }

    args.push("--output".to_string());
    args.push(request.artifact_path().to_string_lossy().into_owned());

    tracing::debug!("capture-website arguments: {:?}", args);
    Ok(args)
}
