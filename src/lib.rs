pub mod api;
pub mod completion;
pub mod composer;
pub mod config;
pub mod context_builder;
pub mod conversation;
pub mod data_models;
pub mod errors;
pub mod normalizer;
pub mod pipeline;
pub mod search_gateway;
