use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long)]
    #[arg(default_value = "0.0.0.0:3030")]
    pub listen_address: SocketAddr,
    /// CSV file with `name,lat,lng,region` rows.
    #[arg(long)]
    #[arg(default_value = "locations.csv")]
    pub locations: PathBuf,
    #[arg(long)]
    #[arg(default_value = "geoguess_server=info")]
    pub log_filter: String,
    #[arg(long = "allowed-origin")]
    #[arg(default_values = ["http://127.0.0.1:3000", "http://localhost:3000"])]
    pub allowed_origins: Vec<String>,
}
