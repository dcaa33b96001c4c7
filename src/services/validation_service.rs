use crate::models::{RenderRequest, IMAGE_FORMAT, INLINE_INPUT};
use crate::services::widget_service;
use crate::utils::ValidationError;

/// Check a request for completeness and attach its widget markup.
///
/// Detail mode derives its label from the symbol, so an empty description is
/// only rejected for the overview widget. Any input marker other than
/// `INLINE_INPUT` drops the markup so the renderer fetches the source itself.
pub fn validate_request(request: &mut RenderRequest) -> Result<(), ValidationError> {
    request.format = IMAGE_FORMAT.to_string();

    if request.symbol.is_empty() {
        return Err(ValidationError::MissingSymbol);
    }

    if request.description.is_empty() && !request.technical_analysis {
        return Err(ValidationError::MissingDescription);
    }

    if request.input.is_empty() {
        return Err(ValidationError::MissingInput);
    }

    if request.output.is_empty() {
        return Err(ValidationError::MissingOutput);
    }

    if request.input == INLINE_INPUT {
        request.html = Some(widget_service::build_markup(request));
    } else {
        request.html = None;
    }

    Ok(())
}
