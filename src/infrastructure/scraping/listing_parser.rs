//! Selector-driven listing extraction

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::domain::tracking::ProductListing;
use crate::shared::errors::ScrapeError;
use crate::shared::types::PriceRange;

/// CSS selectors describing where a site keeps its listing data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// Container matched once per product.
    pub product: String,
    /// Attribute on the container holding the product id.
    pub id_attribute: String,
    /// Title element within the container.
    pub title: String,
    /// Link element within the container; the href is the product url.
    pub link: String,
    /// Price element within the container.
    pub price: String,
}

/// Extracts [`ProductListing`]s from listing-page HTML.
pub struct ListingParser {
    selectors: ListingSelectors,
    product: Selector,
    title: Selector,
    link: Selector,
    price: Selector,
}

impl ListingParser {
    pub fn new(selectors: ListingSelectors) -> Result<Self, ScrapeError> {
        Ok(Self {
            product: compile(&selectors.product)?,
            title: compile(&selectors.title)?,
            link: compile(&selectors.link)?,
            price: compile(&selectors.price)?,
            selectors,
        })
    }

    /// Parse every product entry on the page.
    ///
    /// A container missing one of its expected nodes aborts the whole parse;
    /// the polling loop treats that as a failed cycle and retries later.
    pub fn parse(&self, html: &str) -> Result<Vec<ProductListing>, ScrapeError> {
        let document = Html::parse_document(html);
        let mut listings = Vec::new();

        for product in document.select(&self.product) {
            let product_id = product
                .value()
                .attr(&self.selectors.id_attribute)
                .ok_or_else(|| {
                    ScrapeError::MissingNode(format!(
                        "attribute {:?} on {:?}",
                        self.selectors.id_attribute, self.selectors.product
                    ))
                })?
                .to_string();

            let product_name = product
                .select(&self.title)
                .next()
                .ok_or_else(|| ScrapeError::MissingNode(self.selectors.title.clone()))?
                .text()
                .collect::<String>()
                .trim()
                .to_string();

            let product_url = product
                .select(&self.link)
                .next()
                .and_then(|link| link.value().attr("href"))
                .ok_or_else(|| ScrapeError::MissingNode(self.selectors.link.clone()))?
                .to_string();

            let price_text = product
                .select(&self.price)
                .next()
                .ok_or_else(|| ScrapeError::MissingNode(self.selectors.price.clone()))?
                .text()
                .collect::<String>();

            listings.push(ProductListing {
                product_id,
                product_name,
                product_url,
                prices: parse_price_range(&price_text)?,
            });
        }

        Ok(listings)
    }
}

fn compile(raw: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(raw).map_err(|e| ScrapeError::Selector(raw.to_string(), e.to_string()))
}

/// Pull the `$`-prefixed amounts out of a price element's text.
///
/// The first amount is `min`, the last is `max`; a lone amount fills both.
fn parse_price_range(text: &str) -> Result<PriceRange, ScrapeError> {
    let mut amounts = Vec::new();

    for chunk in text.split('$').skip(1) {
        let token: String = chunk
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
            .collect();
        let token = token.trim_end_matches(['.', ',']).replace(',', "");
        if token.is_empty() {
            continue;
        }
        let amount: f64 = token
            .parse()
            .map_err(|_| ScrapeError::InvalidPrice(text.to_string()))?;
        amounts.push(amount);
    }

    match (amounts.first().copied(), amounts.last().copied()) {
        (Some(min), Some(max)) if max >= min => Ok(PriceRange::new(min, max)),
        (Some(min), Some(max)) => Ok(PriceRange::new(max, min)),
        _ => Err(ScrapeError::InvalidPrice(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_selectors() -> ListingSelectors {
        ListingSelectors {
            product: "div.product-thumb".to_string(),
            id_attribute: "data-productid".to_string(),
            title: "span.product-thumb-title".to_string(),
            link: "a.product-thumb-link".to_string(),
            price: "span.product-thumb-price".to_string(),
        }
    }

    fn parser() -> ListingParser {
        ListingParser::new(test_selectors()).unwrap()
    }

    const PAGE: &str = r#"
        <html><body>
        <div class="product-thumb" data-productid="p1">
            <a class="product-thumb-link" href="/shop/burton-jacket"></a>
            <span class="product-thumb-title">Burton Jacket</span>
            <span class="product-thumb-price"><span>$199.95</span> - <span>$299.95</span></span>
        </div>
        <div class="product-thumb" data-productid="p2">
            <a class="product-thumb-link" href="/shop/686-jacket"></a>
            <span class="product-thumb-title">686 Jacket</span>
            <span class="product-thumb-price"><span>$1,149.00</span></span>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_listing_page() {
        let listings = parser().parse(PAGE).unwrap();
        assert_eq!(listings.len(), 2);

        assert_eq!(listings[0].product_id, "p1");
        assert_eq!(listings[0].product_name, "Burton Jacket");
        assert_eq!(listings[0].product_url, "/shop/burton-jacket");
        assert_eq!(listings[0].prices, PriceRange::new(199.95, 299.95));

        // Single price fills both ends; thousands separator is dropped.
        assert_eq!(listings[1].prices, PriceRange::single(1149.0));
    }

    #[test]
    fn test_page_without_products_parses_empty() {
        let listings = parser().parse("<html><body></body></html>").unwrap();
        assert!(listings.is_empty());
    }

    #[test]
    fn test_missing_title_aborts_parse() {
        let page = r#"
            <div class="product-thumb" data-productid="p1">
                <a class="product-thumb-link" href="/shop/x"></a>
                <span class="product-thumb-price"><span>$10.00</span></span>
            </div>
        "#;
        let result = parser().parse(page);
        assert!(matches!(result, Err(ScrapeError::MissingNode(_))));
    }

    #[test]
    fn test_price_without_amount_is_invalid() {
        let page = r#"
            <div class="product-thumb" data-productid="p1">
                <a class="product-thumb-link" href="/shop/x"></a>
                <span class="product-thumb-title">X</span>
                <span class="product-thumb-price">Call for price</span>
            </div>
        "#;
        let result = parser().parse(page);
        assert!(matches!(result, Err(ScrapeError::InvalidPrice(_))));
    }

    #[test]
    fn test_reversed_amounts_are_normalized() {
        let range = parse_price_range("Was $299.95, now $199.95").unwrap();
        assert_eq!(range, PriceRange::new(199.95, 299.95));
    }

    #[test]
    fn test_bad_selector_is_rejected() {
        let mut selectors = test_selectors();
        selectors.product = ":::".to_string();
        assert!(matches!(
            ListingParser::new(selectors),
            Err(ScrapeError::Selector(_, _))
        ));
    }
}
