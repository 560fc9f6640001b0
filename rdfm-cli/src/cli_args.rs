use clap::{Parser, Subcommand};
use rdfm_core::ClientConfiguration;

#[derive(Clone, Parser)]
#[command(version, about = "Manage device registration on an RDFM management server", long_about = None)]
pub struct Cli {
    #[arg(long, env("RDFM_SERVER_URL"))]
    pub server_url: String,
    #[arg(long, env("RDFM_ACCESS_TOKEN"), hide_env_values = true)]
    pub access_token: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// lists devices waiting for approval
    ListPending,
    /// lists registered devices
    ListRegistered,
    /// approves a pending device
    Register {
        #[arg(long)]
        mac_address: String,
        #[arg(long)]
        public_key: String,
    },
}

impl Cli {
    pub fn client_configuration(&self) -> ClientConfiguration {
        ClientConfiguration::new(self.server_url.clone(), self.access_token.clone())
    }
}
