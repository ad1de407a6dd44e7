// Product schema: a bookable travel offering with pricing, imagery, reviews
// and duration metadata. Only productCode and title are required on the wire.
use serde::{Deserialize, Serialize};

// One resolution of a shared image asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageVariant {
    pub height: u32,
    pub width: u32,
    pub url: String,
}

impl ImageVariant {
    pub fn area(&self) -> u64 {
        u64::from(self.height) * u64::from(self.width)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub variants: Vec<ImageVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_cover: Option<bool>,
}

impl ProductImage {
    pub fn is_cover(&self) -> bool {
        self.is_cover.unwrap_or(false)
    }

    // Variant closest to the requested dimensions by area, ties broken
    // toward the larger variant.
    pub fn variant_for(&self, width: u32, height: u32) -> Option<&ImageVariant> {
        let wanted = u64::from(width) * u64::from(height);
        self.variants.iter().min_by_key(|variant| {
            let area = variant.area();
            let delta = area.abs_diff(wanted);
            (delta, std::cmp::Reverse(area))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_price_before_discount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPricing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PricingSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReviews {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_reviews: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_average_rating: Option<f64>,
}

impl ProductReviews {
    // Average rating rounded to the nearest half star for display.
    pub fn rounded_rating(&self) -> Option<f64> {
        self.combined_average_rating
            .map(|rating| (rating * 2.0).round() / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_duration_in_minutes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_code: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ProductImage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<ProductReviews>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<ProductDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<ProductPricing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
}

impl Product {
    pub fn minimal(product_code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            product_code: product_code.into(),
            title: title.into(),
            description: None,
            images: None,
            reviews: None,
            duration: None,
            pricing: None,
            product_url: None,
        }
    }

    // The designated cover image, falling back to the first listed image.
    pub fn cover_image(&self) -> Option<&ProductImage> {
        let images = self.images.as_deref()?;
        images
            .iter()
            .find(|image| image.is_cover())
            .or_else(|| images.first())
    }

    pub fn from_price(&self) -> Option<f64> {
        self.pricing.as_ref()?.summary?.from_price
    }

    // Absolute discount when the feed carries both prices and the
    // discounted price is actually lower.
    pub fn discount_amount(&self) -> Option<f64> {
        let summary = self.pricing.as_ref()?.summary?;
        match (summary.from_price, summary.from_price_before_discount) {
            (Some(now), Some(before)) if before > now => Some(before - now),
            _ => None,
        }
    }

    pub fn has_discount(&self) -> bool {
        self.discount_amount().is_some()
    }

    pub fn duration_minutes(&self) -> Option<u64> {
        self.duration?.fixed_duration_in_minutes
    }

    pub fn average_rating(&self) -> Option<f64> {
        self.reviews?.combined_average_rating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(width: u32, height: u32) -> ImageVariant {
        ImageVariant {
            height,
            width,
            url: format!("https://img.example.com/{}x{}.jpg", width, height),
        }
    }

    fn tour() -> Product {
        Product {
            description: Some("Skip-the-line access".to_string()),
            images: Some(vec![
                ProductImage {
                    variants: vec![variant(100, 75), variant(800, 600)],
                    is_cover: None,
                },
                ProductImage {
                    variants: vec![variant(400, 300)],
                    is_cover: Some(true),
                },
            ]),
            reviews: Some(ProductReviews {
                total_reviews: Some(1287),
                combined_average_rating: Some(4.7),
            }),
            duration: Some(ProductDuration {
                fixed_duration_in_minutes: Some(90),
            }),
            pricing: Some(ProductPricing {
                summary: Some(PricingSummary {
                    from_price: Some(34.5),
                    from_price_before_discount: Some(46.0),
                }),
                currency: Some("EUR".to_string()),
            }),
            product_url: Some("/tours/eiffel-tower".to_string()),
            ..Product::minimal("P1", "Eiffel Tower Tour")
        }
    }

    #[test]
    fn test_minimal_product_serializes_without_optional_keys() {
        let json = serde_json::to_value(Product::minimal("P1", "Eiffel Tower Tour")).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 2);
        assert_eq!(obj["productCode"], "P1");
        assert_eq!(obj["title"], "Eiffel Tower Tour");
    }

    #[test]
    fn test_serde_round_trip() {
        let original = tour();
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_cover_image_prefers_flagged_image() {
        let product = tour();
        let cover = product.cover_image().unwrap();
        assert_eq!(cover.variants.len(), 1);
        assert_eq!(cover.variants[0].width, 400);
    }

    #[test]
    fn test_cover_image_falls_back_to_first() {
        let mut product = tour();
        if let Some(images) = product.images.as_mut() {
            for image in images.iter_mut() {
                image.is_cover = None;
            }
        }
        let cover = product.cover_image().unwrap();
        assert_eq!(cover.variants[0].width, 100);

        product.images = Some(vec![]);
        assert!(product.cover_image().is_none());
        product.images = None;
        assert!(product.cover_image().is_none());
    }

    #[test]
    fn test_variant_selection_by_dimensions() {
        let image = ProductImage {
            variants: vec![variant(100, 75), variant(400, 300), variant(800, 600)],
            is_cover: None,
        };

        assert_eq!(image.variant_for(390, 290).unwrap().width, 400);
        assert_eq!(image.variant_for(2000, 1500).unwrap().width, 800);
        assert_eq!(image.variant_for(1, 1).unwrap().width, 100);

        let empty = ProductImage {
            variants: vec![],
            is_cover: None,
        };
        assert!(empty.variant_for(400, 300).is_none());
    }

    #[test]
    fn test_variant_tie_breaks_toward_larger() {
        let image = ProductImage {
            variants: vec![variant(100, 100), variant(200, 200)],
            is_cover: None,
        };

        // 250x100 = 25_000 sits exactly between the two areas.
        assert_eq!(image.variant_for(250, 100).unwrap().width, 200);
        assert_eq!(image.variant_for(150, 150).unwrap().width, 100);
        assert_eq!(image.variant_for(180, 180).unwrap().width, 200);
    }

    #[test]
    fn test_pricing_lookups() {
        let product = tour();
        assert_eq!(product.from_price(), Some(34.5));
        assert_eq!(product.discount_amount(), Some(11.5));
        assert!(product.has_discount());

        let bare = Product::minimal("P2", "Louvre Ticket");
        assert_eq!(bare.from_price(), None);
        assert!(!bare.has_discount());
    }

    #[test]
    fn test_inverted_discount_is_not_a_discount() {
        let mut product = tour();
        product.pricing = Some(ProductPricing {
            summary: Some(PricingSummary {
                from_price: Some(50.0),
                from_price_before_discount: Some(40.0),
            }),
            currency: None,
        });
        assert_eq!(product.discount_amount(), None);
    }

    #[test]
    fn test_rounded_rating() {
        let reviews = ProductReviews {
            total_reviews: Some(10),
            combined_average_rating: Some(4.7),
        };
        assert_eq!(reviews.rounded_rating(), Some(4.5));

        let reviews = ProductReviews {
            total_reviews: Some(10),
            combined_average_rating: Some(4.76),
        };
        assert_eq!(reviews.rounded_rating(), Some(5.0));

        assert_eq!(ProductReviews::default().rounded_rating(), None);
    }
}
