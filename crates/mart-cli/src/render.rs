//! Text views of the catalog.

use colored::Colorize;
use mart_types::Product;

/// Storefront listing: name, price, and description of every product.
pub fn catalog_view(products: &[Product]) -> String {
    if products.is_empty() {
        return format!("{}\n", "No products yet.".dimmed());
    }
    let mut out = String::new();
    for product in products {
        out.push_str(&format!(
            "{}  {}\n",
            product.name.bold(),
            price_tag(product.price).green()
        ));
        if !product.description.is_empty() {
            out.push_str(&format!("  {}\n", product.description));
        }
    }
    out
}

/// Admin listing: one row per product with its id.
pub fn admin_view(products: &[Product]) -> String {
    if products.is_empty() {
        return format!("{}\n", "No products. Add one with `mart add`.".dimmed());
    }
    let mut out = format!("{} product(s)\n", products.len().to_string().bold());
    for product in products {
        out.push_str(&format!(
            "{}  {}  {}\n",
            product.id.as_str().yellow(),
            product.name,
            price_tag(product.price).green()
        ));
    }
    out
}

/// Every field of one product; the image is summarised, not printed.
pub fn detail_view(product: &Product) -> String {
    format!(
        "{} {}\n  Name: {}\n  Price: {}\n  Description: {}\n  Image: {}\n",
        "Product".bold(),
        product.id.as_str().yellow(),
        product.name,
        price_tag(product.price),
        product.description,
        image_summary(&product.image).dimmed()
    )
}

pub fn price_tag(price: f64) -> String {
    format!("NT$ {price}")
}

fn image_summary(image: &str) -> String {
    match mart_types::ImageData::parse(image) {
        Ok(data) => format!("{} ({} base64 chars)", data.mime_type(), data.payload().len()),
        Err(_) if image.is_empty() => "(none)".into(),
        Err(_) => format!("{} chars", image.chars().count()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mart_types::ProductId;

    fn product(id: &str, name: &str, price: f64) -> Product {
        Product {
            id: ProductId::from(id),
            name: name.into(),
            price,
            description: "hand made".into(),
            image: "data:image/png;base64,AAAA".into(),
        }
    }

    #[test]
    fn empty_catalog_has_a_message() {
        assert!(catalog_view(&[]).contains("No products yet."));
        assert!(admin_view(&[]).contains("mart add"));
    }

    #[test]
    fn catalog_lists_in_order() {
        let view = catalog_view(&[product("b", "Second", 20.0), product("a", "First", 10.0)]);
        let second = view.find("Second").unwrap();
        let first = view.find("First").unwrap();
        assert!(second < first);
        assert!(view.contains("NT$ 20"));
        assert!(view.contains("hand made"));
    }

    #[test]
    fn admin_view_shows_ids() {
        let view = admin_view(&[product("prod_1_abcdefg", "Lamp", 99.5)]);
        assert!(view.contains("prod_1_abcdefg"));
        assert!(view.contains("NT$ 99.5"));
    }

    #[test]
    fn detail_summarises_image() {
        let view = detail_view(&product("x", "Lamp", 1.0));
        assert!(view.contains("image/png"));
        assert!(!view.contains("AAAA"));
    }

    #[test]
    fn whole_prices_have_no_fraction() {
        assert_eq!(price_tag(100.0), "NT$ 100");
        assert_eq!(price_tag(12.5), "NT$ 12.5");
    }
}
