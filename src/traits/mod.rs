pub mod capture;
pub mod decoder;
pub mod delegate;
pub mod encoder;
pub mod environment;
pub mod playback;
