pub mod chat_button;

pub use chat_button::ChatButtonService;
