use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ocsp-cache")]
#[command(version)]
#[command(about = "Certificate-status cache for signed OCSP responses")]
#[command(long_about = None)]
pub struct Cli {
    /// Store directory
    #[arg(long, env = "OCSP_CACHE_STORE", default_value = "./ocsp-cache-store")]
    pub store_dir: String,

    /// Enable verbose logging (repeat for more verbosity: -v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a certificate-addition request and persist its records
    Add {
        /// Path to a JSON request document, or - for stdin
        #[arg(default_value = "-")]
        file: String,

        /// Do not sign an initial OCSP response
        #[arg(long)]
        no_initial_response: bool,

        /// Validity window of the initial signed response, in seconds
        #[arg(long, env = "OCSP_CACHE_VALIDITY_SECS", default_value_t = 345_600)]
        validity_secs: u64,
    },
    /// Run the background refresh loop until interrupted
    Refresh {
        /// Seconds between refresh cycles
        #[arg(long, env = "OCSP_CACHE_POLL_SECS", default_value_t = 900)]
        poll_secs: u64,

        /// Validity window of renewed responses, in seconds
        #[arg(long, env = "OCSP_CACHE_VALIDITY_SECS", default_value_t = 345_600)]
        validity_secs: u64,
    },
    /// Print the current signed response for a certificate identity
    Respond {
        /// Certificate serial number (base-16)
        serial: String,

        /// Issuer key hash, hex encoded
        #[arg(long)]
        aki: String,
    },
}
