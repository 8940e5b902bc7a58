pub mod prune;
pub mod scan;
pub mod sweep;

pub use prune::prune_empty_dirs;
pub use scan::scan_archives;
pub use sweep::{sweep_unreferenced, unreferenced};
