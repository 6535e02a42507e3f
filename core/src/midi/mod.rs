pub mod encoder;
pub mod gm;
pub mod messages;
pub use messages::Message;
pub mod types;
