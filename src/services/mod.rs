pub mod argument_service;
pub mod chart_service;
pub mod cleanup_service;
pub mod renderer_service;
pub mod validation_service;
pub mod widget_service;
