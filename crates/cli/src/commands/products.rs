//! Product commands.
//!
//! # Usage
//!
//! ```bash
//! stockroom products list --page 1 --per-page 10
//! stockroom products add --name Widget --type Tools --sku W-1 --quantity 5 --price 19.99
//! stockroom products set-quantity 665f1c2e 12
//! ```

use std::io::Write;

use comfy_table::{ContentArrangement, Table};
use stockroom_client::InventoryClient;
use stockroom_core::{Page, PageRequest, Product, ProductDraft, ProductId, Quantity};

use super::CommandError;

/// Print one page of products as a table.
pub async fn list(
    client: &InventoryClient,
    out: &mut impl Write,
    page: u32,
    per_page: u32,
) -> Result<(), CommandError> {
    let request = PageRequest::new(page, per_page)?;
    let page = client.list_products(request).await?;

    write_page(out, &page)?;
    Ok(())
}

/// Validate and create a product.
pub async fn add(
    client: &InventoryClient,
    out: &mut impl Write,
    draft: &ProductDraft,
) -> Result<(), CommandError> {
    let product = client.submit_product(draft).await?;

    writeln!(out, "Added {} ({}) with id {}", product.name, product.sku, product.id)?;
    Ok(())
}

/// Set a product's stock quantity.
pub async fn set_quantity(
    client: &InventoryClient,
    out: &mut impl Write,
    id: &str,
    quantity: &str,
) -> Result<(), CommandError> {
    let quantity = Quantity::parse(quantity)?;
    let updated = client.update_quantity(&ProductId::new(id), quantity).await?;

    writeln!(
        out,
        "{} ({}) now has {} in stock ({})",
        updated.name,
        updated.id,
        updated.quantity,
        updated.quantity.stock_level()
    )?;
    Ok(())
}

fn write_page(out: &mut impl Write, page: &Page<Product>) -> std::io::Result<()> {
    let request = page.request();

    if page.is_empty() {
        writeln!(out, "No products on page {}.", request.page())?;
        return Ok(());
    }

    writeln!(out, "{}", product_table(page.items()))?;
    let noun = if page.len() == 1 { "product" } else { "products" };
    writeln!(out, "Page {} ({} {noun})", request.page(), page.len())?;

    if page.has_more() {
        writeln!(
            out,
            "More pages may exist: stockroom products list --page {} --per-page {}",
            request.next().page(),
            request.per_page()
        )?;
    }
    Ok(())
}

fn product_table(products: &[Product]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["ID", "Name", "Type", "SKU", "Qty", "Stock", "Price"]);

    for product in products {
        table.add_row([
            product.id.to_string(),
            product.name.clone(),
            product.product_type.clone(),
            product.sku.clone(),
            product.quantity.to_string(),
            product.quantity.stock_level().to_string(),
            product.price.to_string(),
        ]);
    }

    table
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use stockroom_core::Price;

    use super::*;

    fn product(id: &str, quantity: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            product_type: "Tools".to_string(),
            sku: format!("SKU-{id}"),
            quantity: Quantity::new(quantity),
            price: Price::new(Decimal::new(450, 2)).unwrap(),
            image_url: None,
            description: None,
        }
    }

    fn render(page: &Page<Product>) -> String {
        let mut out = Vec::new();
        write_page(&mut out, page).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_full_page_hints_at_more() {
        let request = PageRequest::new(1, 2).unwrap();
        let output = render(&Page::new(vec![product("a", 0), product("b", 50)], request));

        assert!(output.contains("SKU-a"));
        assert!(output.contains("out of stock"));
        assert!(output.contains("in stock"));
        assert!(output.contains("4.50"));
        assert!(output.contains("Page 1 (2 products)"));
        assert!(output.contains("--page 2 --per-page 2"));
    }

    #[test]
    fn test_short_page_has_no_hint() {
        let request = PageRequest::new(3, 10).unwrap();
        let output = render(&Page::new(vec![product("c", 3)], request));

        assert!(output.contains("low stock"));
        assert!(output.contains("Page 3 (1 product)"));
        assert!(!output.contains("More pages may exist"));
    }

    #[test]
    fn test_empty_page() {
        let request = PageRequest::default();
        let output = render(&Page::new(Vec::new(), request));
        assert_eq!(output.trim(), "No products on page 1.");
    }
}
