pub mod consts;
pub mod engine;
pub mod handlers;
pub mod labels;
pub mod message_types;
pub mod models;
pub mod services;
pub mod timer;
