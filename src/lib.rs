pub mod buffer;
pub mod config;
pub mod error;
pub mod loader;
pub mod options;
pub mod scan;
pub mod types;
pub mod platform {
    pub mod cursor;
    pub mod framebuffer;
}
pub mod processing {
    pub mod color;
    pub mod layout;
    pub mod scale;
}
pub mod render {
    pub mod compose;
    pub mod present;
    pub mod surface;
}
pub mod tasks {
    pub mod shutdown;
    pub mod slideshow;
}
