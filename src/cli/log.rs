use crate::cli::Args;
use log::{error, info};
use msendpoints::{Error, Query};

/*-------------------------------------------------------------------------------------------------
  Logging Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Logger
--------------------------------------------------------------------------------------*/

/// Send log records to standard error at the verbosity chosen on the command line.
pub fn init(args: &Args) {
    stderrlog::new()
        .module("msendpoints")
        .quiet(args.verbose.is_silent())
        .verbosity(args.verbose.log_level_filter())
        .init()
        .ok();
}

/*--------------------------------------------------------------------------------------
  Query
--------------------------------------------------------------------------------------*/

pub fn query(query: &Query) {
    let filter = &query.filter;
    let scope = if filter.required_only() {
        "required"
    } else {
        "all"
    };
    info!(
        "Collecting {} {} for region {}",
        scope,
        filter.category(),
        query.region
    );
}

/*--------------------------------------------------------------------------------------
  Errors
--------------------------------------------------------------------------------------*/

pub fn failure(error: &Error) {
    error!("{error}");
    if let Error::Fetch { .. } = error {
        error!("No usable cached copy is available; check network access and try again");
    }
}
