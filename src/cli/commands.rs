use clap::Subcommand;

use super::config::ConfigArgs;
use super::purge::PurgeArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Delete archives no longer referenced by the repository metadata
    Purge(PurgeArgs),

    /// Inspect and validate the repository configuration
    Config(ConfigArgs),
}
