pub mod base64;
pub mod http;
pub mod number;
pub mod url;
pub mod yaml;

// Re-export common utilities
pub use self::base64::{base64_decode, base64_encode};
pub use self::number::{validate_number, MAX_REASONABLE_VALUE};
pub use self::url::{is_valid_url, url_decode};
pub use self::yaml::dump_quoted;
