pub mod errors;
pub mod fs;
pub mod io;

pub mod prelude {
    pub use super::errors::{is_broken_pipe, Result, TallyError};
    pub use super::fs::{is_bgzipped, make_parent_dirs};
    pub use super::io::get_writer;
}
