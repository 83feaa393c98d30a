use clap::{Parser, ValueEnum};
use protocol::Priority;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "greenlight",
    version,
    about = "Prior authorization submission console"
)]
pub(crate) struct Args {
    /// TOML config with webhook and roster overrides.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Webhook URL, overrides the config file.
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
    #[arg(long, default_value = "logs")]
    pub(crate) log_dir: PathBuf,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
    /// Submit once for this patient id, print the decision, and exit.
    #[arg(long)]
    pub(crate) patient: Option<String>,
    #[arg(long, value_enum, default_value_t = PriorityArg::Standard)]
    pub(crate) priority: PriorityArg,
    #[arg(long, default_value = "")]
    pub(crate) notes: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum PriorityArg {
    Standard,
    Urgent,
    Emergency,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Standard => Priority::Standard,
            PriorityArg::Urgent => Priority::Urgent,
            PriorityArg::Emergency => Priority::Emergency,
        }
    }
}
