pub mod restricted_string;
pub mod structured_string;
