pub mod enumerate;
pub mod input;

pub use enumerate::{
    FileEnumerator, class_name_for, class_short_name, enumerate_files,
    enumerate_files_with_extension, join_path, namespace_path,
};
pub use input::{FileReader, InputReader, StdinReader, VecReader};
