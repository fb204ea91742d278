#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sos", version, about = "Voice-triggered emergency assistant")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "State file (overrides SOS_STATE_PATH and the config-dir default)"
    )]
    pub state: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report which emergency keyword, if any, a transcript contains.
    Detect {
        transcript: String,
    },
    /// Run the full activation flow from a transcript or an explicit type.
    Activate {
        #[arg(required_unless_present = "emergency_type")]
        transcript: Option<String>,
        #[arg(long = "type", conflicts_with = "transcript")]
        emergency_type: Option<String>,
    },
    /// Feed utterances through the wake-phrase session in order.
    Voice {
        #[arg(required = true)]
        utterances: Vec<String>,
    },
    Instructions {
        emergency_type: String,
    },
    Reward {
        emergency_type: String,
        #[arg(long, default_value = "emergency_activation")]
        action: String,
    },
    Train {
        #[command(subcommand)]
        command: CompleteCommands,
    },
    Challenge {
        #[command(subcommand)]
        command: CompleteCommands,
    },
    Progress,
    Contacts {
        #[command(subcommand)]
        command: ContactCommands,
    },
    Totals,
    Records,
    /// Show the achievement catalog and which entries are unlocked.
    Achievements,
}

#[derive(Subcommand, Debug)]
pub enum CompleteCommands {
    Complete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ContactCommands {
    Add { name: String, phone: String },
    Rm,
    Ls,
}
