use serde::Serialize;

use crate::dom::{Document, ElementSpec, Selector};
use crate::error::{AppError, AppResult};
use crate::site::{Feature, PageContext};

pub const JSON_LD_TYPE: &str = "application/ld+json";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PostalAddress {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "streetAddress")]
    pub street_address: &'static str,
    #[serde(rename = "addressLocality")]
    pub address_locality: &'static str,
    #[serde(rename = "postalCode")]
    pub postal_code: &'static str,
    #[serde(rename = "addressCountry")]
    pub address_country: &'static str,
}

/// schema.org profile of the organisation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProfile {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub telephone: &'static str,
    pub email: &'static str,
    pub address: PostalAddress,
    pub opening_hours: Vec<&'static str>,
    pub area_served: &'static str,
    pub same_as: Vec<&'static str>,
}

impl OrganizationProfile {
    pub fn rescue() -> Self {
        Self {
            context: "https://schema.org",
            kind: "AnimalShelter",
            name: "Neptune Claws & Paws Rescue",
            description: "Rescuing and rehoming abandoned cats and dogs in Johannesburg since 2015",
            url: "https://ncpr.org.za",
            telephone: "+27-11-456-7890",
            email: "info@ncpr.org.za",
            address: PostalAddress {
                kind: "PostalAddress",
                street_address: "123 Rescue Street",
                address_locality: "Johannesburg",
                postal_code: "2000",
                address_country: "ZA",
            },
            opening_hours: vec!["Mo-Fr 09:00-18:00", "Sa 10:00-16:00", "Su 12:00-16:00"],
            area_served: "Johannesburg and surrounding areas",
            same_as: vec![
                "https://www.facebook.com/neptunecpr",
                "https://www.instagram.com/neptunecpr",
            ],
        }
    }

    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string(self).map_err(|source| AppError::serialize("structured data", source))
    }
}

/// Appends the JSON-LD script to `<head>` unless one is already there.
/// Returns whether a script was added.
pub fn inject(doc: &mut dyn Document, profile: &OrganizationProfile) -> AppResult<bool> {
    let existing = Selector::tag("script").and(Selector::attr_eq("type", JSON_LD_TYPE));
    let head = doc.head();
    if !doc.query_within(head, &existing).is_empty() {
        return Ok(false);
    }
    let json = profile.to_json()?;
    doc.append_child(
        head,
        ElementSpec::new("script")
            .attr("type", JSON_LD_TYPE)
            .text(json),
    );
    Ok(true)
}

pub struct StructuredData;

impl Feature for StructuredData {
    type State = ();

    const NAME: &'static str = "structured-data";

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State> {
        if inject(ctx.doc, &OrganizationProfile::rescue())? {
            tracing::debug!("structured data injected");
        }
        Ok(())
    }
}
