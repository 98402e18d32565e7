//! Show the courier price list.

use std::path::Path;

use techstore_core::ShippingRegion;
use techstore_storefront::shipping::RateTable;
use tracing::info;

use super::print_json;

/// Print `table`, or the table at `path` when given.
///
/// # Errors
///
/// Returns an error if the table file is invalid or output fails.
pub fn run(
    table: &RateTable,
    path: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded;
    let table = match path {
        Some(path) => {
            loaded = RateTable::from_path(path)?;
            &loaded
        }
        None => table,
    };

    if json {
        print_json(table)?;
        return Ok(());
    }

    let header: Vec<&str> = ShippingRegion::ALL.iter().map(ShippingRegion::as_str).collect();
    info!("{:<16} {}", "service", header.join(" | "));
    for service in table.services() {
        let row: Vec<String> = ShippingRegion::ALL
            .iter()
            .map(|region| {
                table
                    .price(service, *region)
                    .map_or_else(|| "-".to_string(), |p| p.to_string())
            })
            .collect();
        info!("{:<16} {}", service.to_string(), row.join(" | "));
    }
    Ok(())
}
