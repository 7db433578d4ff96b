pub mod model;

// Re-export commonly used loaders for consumers
pub use model::{load_labels, load_program, parse_label_arg, parse_u32, InputFormat};
