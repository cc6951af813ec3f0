#[macro_use]
mod macros;

pub mod api;
pub mod config;
pub mod cookie_store;
pub mod data_collector;
pub mod debug_dump;
pub mod fs_json_util;
pub mod page;
pub mod page_source;
pub mod site_trait;
pub mod song;
pub mod tab4u;
pub mod ultimate_guitar;
