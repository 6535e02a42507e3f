pub mod config;
pub mod events;
pub mod instrument;
pub mod midi;
pub mod pitch;
pub mod player;
pub mod storage;
pub mod studio;
pub mod synth;
pub mod time;
pub mod tune;
