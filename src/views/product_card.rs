//! Product card rendering.

use crate::core::Product;
use crate::views::format::format_price;

use std::fmt::Write;

/// Renders a [`Product`] as text.
#[derive(Debug, Clone, Copy)]
pub struct ProductCard<'a> {
    product: &'a Product,
}

impl<'a> ProductCard<'a> {
    /// Creates a card for the given product.
    pub fn new(product: &'a Product) -> Self {
        Self { product }
    }

    /// Renders the card.
    ///
    /// Optional fields are omitted when absent. Attributes are listed under
    /// "Detalles", sorted by key.
    pub fn render(&self) -> String {
        let product = self.product;
        let mut out = String::new();

        if let Some(url) = &product.image_url {
            let _ = writeln!(out, "[imagen: {url}]");
        }
        let _ = writeln!(out, "{}", product.title);
        let _ = writeln!(
            out,
            "Precio: {}",
            format_price(product.price, &product.currency)
        );
        if let Some(brand) = &product.brand {
            let _ = writeln!(out, "Marca: {brand}");
        }
        if let Some(description) = &product.description {
            let _ = writeln!(out, "{description}");
        }
        if !product.attributes.is_empty() {
            out.push_str("Detalles\n");
            for (key, value) in &product.attributes {
                let _ = writeln!(out, "- {key}: {value}");
            }
        }
        out
    }
}
