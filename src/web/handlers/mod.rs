pub mod history;
pub mod recommendations;
