pub mod http;
pub mod logs;
pub mod relay;
pub mod send;
pub mod servers;
pub mod settings;
pub mod status;
