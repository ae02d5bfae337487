pub mod http;
pub mod responses;
