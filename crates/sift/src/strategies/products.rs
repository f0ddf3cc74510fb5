// ABOUTME: Product listing strategy for shop pages: name, price, rating, link and image per container.
// ABOUTME: Containers with neither a name nor a price are discarded as layout noise.

use scraper::ElementRef;

use crate::dom::patterns::{PRICE, PRODUCT_NAME, PRODUCT_OR_ITEM, RATING};
use crate::dom::{first_image, first_link, text_of, Page, Scope};
use crate::record::{Provenance, Record};

fn product_record(product: ElementRef<'_>, product_index: usize) -> Record {
    let scope = Scope::within(product);
    let mut record = Record::with_provenance(Provenance::Product {
        product: product_index,
    });

    let name = scope
        .find_first_by_class(&PRODUCT_NAME)
        .or_else(|| scope.find_first_by_tag(&["h2", "h3", "h4"]));
    record.insert_opt("name", name.map(text_of));
    record.insert_opt("price", scope.find_first_by_class(&PRICE).map(text_of));
    record.insert_opt("rating", scope.find_first_by_class(&RATING).map(text_of));
    record.insert_opt("link", first_link(scope));
    record.insert_opt("image", first_image(scope));
    record
}

fn has_name_or_price(record: &Record) -> bool {
    ["name", "price"]
        .iter()
        .any(|field| record.text(field).is_some_and(|v| !v.is_empty()))
}

pub fn extract(page: &Page) -> Vec<Record> {
    page.scope()
        .find_all_by_class(&PRODUCT_OR_ITEM)
        .enumerate()
        .map(|(i, product)| product_record(product, i))
        .filter(has_name_or_price)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn extracts_product_fields() {
        let html = r#"
            <ul>
                <li class="product">
                    <a href="/p/1"><img src="/1.jpg"></a>
                    <h3>Kettle</h3>
                    <span class="price">$20</span>
                    <span class="rating">4.5</span>
                </li>
                <li class="product">
                    <span class="product-name">Toaster</span>
                    <h2>Ignored heading</h2>
                </li>
            </ul>
        "#;
        let records = extract(&Page::parse(html));
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!([
                {"name": "Kettle", "price": "$20", "rating": "4.5", "link": "/p/1",
                 "image": "/1.jpg", "_product_index": 0},
                {"name": "Toaster", "_product_index": 1}
            ])
        );
    }

    #[test]
    fn drops_noise_but_keeps_indices() {
        let html = r#"
            <div class="item-wrapper"><span>decor</span></div>
            <div class="item"><span class="price">9.99</span></div>
        "#;
        let records = extract(&Page::parse(html));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text("price"), Some("9.99"));
        assert!(!records[0].contains("name"));
        assert_eq!(
            records[0].provenance(),
            Some(Provenance::Product { product: 1 })
        );
    }

    #[test]
    fn blank_name_and_price_do_not_count() {
        let html = r#"<div class="product"><h3> </h3><span class="price"></span></div>"#;
        assert!(extract(&Page::parse(html)).is_empty());
    }
}
