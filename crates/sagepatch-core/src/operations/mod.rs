pub mod file_operations;
pub mod patch_applicator;
pub mod preflight_checks;

pub use file_operations::{read_file_content, replace_file_atomically, write_file_content};
pub use patch_applicator::patch_file;
pub use preflight_checks::run_preflight_checks;
