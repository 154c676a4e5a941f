use crate::cli;
use msendpoints::{Filter, FilterBuilder, Query, Result};

/*-------------------------------------------------------------------------------------------------
  Core functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Build the item filter from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_filter(args: &cli::Args) -> Result<Filter> {
    let mut builder = FilterBuilder::new(args.category.into());

    if args.required {
        builder = builder.required_only();
    }
    if args.ipv4 {
        builder = builder.ipv4();
    }
    if args.ipv6 {
        builder = builder.ipv6();
    }

    builder.build()
}

/*--------------------------------------------------------------------------------------
  Build the pipeline query from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_query(args: &cli::Args) -> Result<Query> {
    Ok(Query {
        region: cli::utils::normalize_region(&args.region),
        filter: build_filter(args)?,
        ignore_cache: args.ignorecache,
    })
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
