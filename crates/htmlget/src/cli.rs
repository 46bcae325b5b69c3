use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(name = "htmlget", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct App {
    /// Address of the HTML page to fetch
    pub url: String,
}
