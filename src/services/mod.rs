pub mod ai_service;
pub mod extract_service;
pub mod grading_service;
pub mod prompt_service;
pub mod response_parser;
pub mod session_service;
pub mod stream_decoder;
