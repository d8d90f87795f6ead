//! Pieces shared by the agenda binaries and crates.

pub mod utils {
    pub mod logging;
}
