// Messaging module - Tone channel to the audio thread and user notifications

pub mod channels;
pub mod notification;
