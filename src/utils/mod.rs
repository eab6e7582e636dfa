pub mod channel_name;

pub use channel_name::clean_channel_name;
