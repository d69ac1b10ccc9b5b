//! Page capacity and splitting

mod capacity;
mod splitter;

pub use capacity::{CapacityModel, A4_HEIGHT, A4_WIDTH, DEFAULT_CHARS_PER_LINE};
pub use splitter::{split_chunks, split_into_pages, BOUNDARY_WINDOW};
