/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod cache;
pub mod category;
pub mod client;
pub mod directory;
pub mod errors;
pub mod filter;
pub mod json;
pub mod output;
pub mod prefix_type;
pub mod service_record;
pub mod transport;
