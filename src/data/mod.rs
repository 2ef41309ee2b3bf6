pub mod item;
pub mod npy;
pub mod render;
