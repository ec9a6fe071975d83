pub mod api_service;
pub mod attempt_service;
pub mod execution_service;
pub mod result_service;
