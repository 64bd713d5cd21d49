pub mod controller;
pub mod resources;
pub mod task;
