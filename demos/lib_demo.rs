use msendpoints::{Category, ClientBuilder, FilterBuilder, Query, Result};

fn main() -> Result<()> {
    let client = ClientBuilder::new().build()?;

    // List the published regions
    let directory = client.get_directory()?;
    for region in directory.regions() {
        println!("{region}");
    }

    // Required IPv6 prefixes of the worldwide region
    let query = Query {
        region: "worldwide".to_string(),
        filter: FilterBuilder::new(Category::Ips)
            .required_only()
            .ipv6()
            .build()?,
        ignore_cache: false,
    };
    for prefix in client.get_items(&query)? {
        println!("{prefix}");
    }

    // Work with the service records directly
    let records = client.get_region_data(&directory, "worldwide", false)?;
    let required = records.iter().filter(|record| record.required).count();
    println!("{} service records, {} required", records.len(), required);

    Ok(())
}
