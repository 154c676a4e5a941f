use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(author, version, about = "Microsoft Domain/IP Listing Tool", long_about = None)]
pub struct Args {
    /// Region to select from (e.g. worldwide, usgovdod, usgovgcchigh, china)
    pub region: String,

    /// Item to get data for
    #[arg(value_enum, ignore_case = true)]
    pub category: CategoryArg,

    /// Only collect items that are marked as required; otherwise collect all items
    #[arg(long)]
    pub required: bool,

    /// Force a refresh of the cached region data
    #[arg(long)]
    pub ignorecache: bool,

    /// Output to the given file instead of the console
    #[arg(long, value_name = "OUTFILE")]
    pub outfile: Option<PathBuf>,

    /// Append to the output file instead of writing a new file
    #[arg(long, requires = "outfile")]
    pub append: bool,

    /// Only include IPv4 prefixes (ips category)
    #[arg(short = '4', long)]
    pub ipv4: bool,

    /// Only include IPv6 prefixes (ips category)
    #[arg(short = '6', long)]
    pub ipv6: bool,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CategoryArg {
    /// URL patterns
    Urls,
    /// IPv4 and IPv6 network prefixes
    Ips,
}

impl From<CategoryArg> for msendpoints::Category {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Urls => msendpoints::Category::Urls,
            CategoryArg::Ips => msendpoints::Category::Ips,
        }
    }
}
