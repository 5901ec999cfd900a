//! One-off catalog migration: repoint `product_url` values from the old
//! storefront host to the canonical site domain, keeping the product
//! handle (the last URL path segment) intact.

use crate::catalog::Product;

/// Summary of a rewrite pass over a product list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteReport {
    pub total: usize,
    pub changed: usize,
    /// First rewritten URL, handy for eyeballing the result.
    pub sample: Option<String>,
}

/// Rewrite in place every `product_url` that mentions `from_host`,
/// producing `{to_base}/products/{handle}`. Records without a URL or on a
/// different host are untouched.
pub fn rewrite_product_urls(
    products: &mut [Product],
    from_host: &str,
    to_base: &str,
) -> RewriteReport {
    let base = to_base.trim_end_matches('/');
    let mut changed = 0;
    let mut sample = None;

    for product in products.iter_mut() {
        let Some(url) = product.product_url.as_deref() else { continue };
        if !url.contains(from_host) {
            continue;
        }

        let handle = url.rsplit('/').next().unwrap_or_default();
        let rewritten = format!("{base}/products/{handle}");
        if sample.is_none() {
            sample = Some(rewritten.clone());
        }
        product.product_url = Some(rewritten);
        changed += 1;
    }

    RewriteReport { total: products.len(), changed, sample }
}
