// Per-vehicle presentation values: detail page, listing card and page meta
use crate::model::VehicleRecord;
use crate::normalizer::{self, CanonicalFields};
use crate::utils::html_to_text;

pub const NOT_AVAILABLE: &str = "Not available";
pub const DEFAULT_OG_IMAGE: &str = "/og-image.html";

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn or_not_available(value: Option<&str>) -> String {
    non_empty(value).unwrap_or(NOT_AVAILABLE).to_string()
}

/// Main image: first page image, else the single image, else the HTML snapshot.
pub fn hero_image(record: &VehicleRecord) -> Option<&str> {
    non_empty(record.images.first().map(String::as_str))
        .or_else(|| non_empty(record.allpagedata_images.first().map(String::as_str)))
        .or_else(|| non_empty(record.one_image.as_deref()))
        .or_else(|| non_empty(record.html_s3_url.as_deref()))
}

/// Thumbnail strip for the detail page.
pub fn gallery(record: &VehicleRecord) -> Vec<String> {
    if !record.images.is_empty() {
        return record.images.clone();
    }
    if !record.allpagedata_images.is_empty() {
        return record.allpagedata_images.clone();
    }
    non_empty(record.one_image.as_deref())
        .or_else(|| non_empty(record.html_s3_url.as_deref()))
        .map(|url| vec![url.to_string()])
        .unwrap_or_default()
}

/// One row of the listing grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingCard {
    pub stock_number: String,
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub vin_text: String,
    pub final_bid: String,
}

impl ListingCard {
    pub fn from_record(record: &VehicleRecord) -> Self {
        let fields = normalizer::normalize(record);
        let title = normalizer::title(record, &fields);
        let subtitle = normalizer::subtitle(&fields);
        let vin_text = non_empty(record.vin_display.as_deref())
            .map(html_to_text)
            .unwrap_or_else(|| "No VIN info".to_string());

        Self {
            stock_number: record.stock_number.clone(),
            title: or_not_available(Some(title.as_str())),
            subtitle: or_not_available(Some(subtitle.as_str())),
            image: hero_image(record).unwrap_or_default().to_string(),
            vin_text,
            final_bid: or_not_available(record.final_bid.as_deref()),
        }
    }
}

/// Everything the detail page shows for one vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDetail {
    pub stock_number: String,
    pub title: String,
    pub composed_vin: String,
    pub final_bid: String,
    pub vin_display_html: String,
    pub vin_display_text: String,
    pub hero_image: String,
    pub gallery: Vec<String>,
    pub spin_frames: Vec<String>,
    /// "Vehicle Details" section.
    pub legacy_fields: CanonicalFields,
    /// "New Details" section.
    pub fresh_fields: CanonicalFields,
}

impl VehicleDetail {
    pub fn from_record(record: &VehicleRecord) -> Self {
        let fields = normalizer::normalize(record);
        let vin_display_html = record.vin_display.clone().unwrap_or_default();

        Self {
            stock_number: record.stock_number.clone(),
            title: normalizer::title(record, &fields),
            composed_vin: normalizer::composed_vin(record, &fields),
            final_bid: or_not_available(record.final_bid.as_deref()),
            vin_display_text: html_to_text(&vin_display_html),
            vin_display_html,
            hero_image: hero_image(record).unwrap_or_default().to_string(),
            gallery: gallery(record),
            spin_frames: record.allpagedata_3sixty.clone(),
            legacy_fields: normalizer::legacy_fields(record),
            fresh_fields: normalizer::fresh_fields(record),
        }
    }

    pub fn has_spin_view(&self) -> bool {
        !self.spin_frames.is_empty()
    }
}

/// Values for the document title and social meta tags of a detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub page_title: String,
    pub vin: String,
    pub description: String,
    pub image: String,
}

impl PageMeta {
    pub fn for_record(record: &VehicleRecord, site_name: &str) -> Self {
        let fields = normalizer::normalize(record);
        let title = normalizer::title(record, &fields);

        let vin = match fields.get("VIN").map(str::trim).filter(|v| !v.is_empty()) {
            Some(vin) => vin.to_string(),
            None => record.ocr_result.as_deref().unwrap_or("").trim().to_string(),
        };

        let mut description = normalizer::subtitle(&fields);
        if !vin.is_empty() {
            description.push_str(&format!(" – VIN: {}", vin));
        }

        Self {
            page_title: format!("{} | {}", title, site_name),
            title,
            vin,
            description,
            image: hero_image(record).unwrap_or(DEFAULT_OG_IMAGE).to_string(),
        }
    }

    /// `(property, content)` pairs for Open Graph and Twitter cards.
    /// The page URL is the caller's to supply.
    pub fn tags(&self, page_url: &str) -> Vec<(&'static str, String)> {
        vec![
            ("og:title", self.title.clone()),
            ("og:description", self.description.clone()),
            ("og:image", self.image.clone()),
            ("og:url", page_url.to_string()),
            ("og:type", "article".to_string()),
            ("twitter:card", "summary_large_image".to_string()),
            ("twitter:title", self.title.clone()),
            ("twitter:description", self.description.clone()),
            ("twitter:image", self.image.clone()),
            ("vehicle:vin", self.vin.clone()),
        ]
    }
}
