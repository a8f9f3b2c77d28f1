pub mod vm;
pub mod views;

pub use views::render_session;
