mod logging;

pub use logging::RequestLogging;
