//! Catalog commands - adding products, listing them and assigning priority tiers.

use crate::{
    cli::{AppContext, CatalogAction},
    core::{catalog, report},
    errors::Result,
};

/// Runs a `catalog` subcommand.
pub async fn handle(ctx: &AppContext, action: CatalogAction) -> Result<String> {
    let db = &ctx.database;
    match action {
        CatalogAction::Add {
            code,
            name,
            units_per_box,
            priority,
        } => {
            let product = catalog::create_product(db, &code, &name, units_per_box, priority).await?;
            Ok(format!(
                "Added {} ({}): {} units per box, {} priority\n",
                product.code, product.name, product.units_per_box, product.priority
            ))
        }
        CatalogAction::List { search } => {
            let products = match search {
                Some(term) => catalog::search_products(db, &term).await?,
                None => catalog::get_all_products(db).await?,
            };
            Ok(report::format_products(&products))
        }
        CatalogAction::Priority { code, priority } => {
            let product = catalog::set_priority(db, &code, priority).await?;
            Ok(format!(
                "{} ({}) is now {} priority\n",
                product.code, product.name, product.priority
            ))
        }
    }
}
