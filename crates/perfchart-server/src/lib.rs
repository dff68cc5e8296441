pub mod config;
pub mod page;
pub mod server;

pub use server::{build_router, render_throughput_png, AppState, Server};
