use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::custom_field::CustomFields;
use crate::domain::types::{
    Address, BusinessId, BusinessName, BusinessStatus, CategoryId, Coordinates, Email, ImagePath,
    PhoneNumber, PriceRange, Rating, ReviewCount, Slug, UserId, ViewCount, WebsiteUrl,
};

/// Label shown when a listing points at a category that no longer exists.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Opening hours for a single weekday.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayHours {
    pub open: String,
    pub close: String,
    #[serde(default)]
    pub closed: bool,
}

/// Weekday name (`monday`..`sunday`) to opening hours.
pub type BusinessHours = BTreeMap<String, DayHours>;

/// Social network profile links.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// A directory listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: BusinessId,
    pub name: BusinessName,
    pub slug: Slug,
    pub category_id: CategoryId,
    /// Display label of the category, resolved when the record is read.
    pub category: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub address: Address,
    pub coordinates: Option<Coordinates>,
    pub phone: Option<PhoneNumber>,
    pub email: Option<Email>,
    pub website: Option<WebsiteUrl>,
    pub price_range: PriceRange,
    pub rating: Rating,
    pub review_count: ReviewCount,
    pub view_count: ViewCount,
    pub image_url: Option<ImagePath>,
    pub images: Vec<ImagePath>,
    pub is_active: bool,
    /// Awaiting moderation; only meaningful while inactive.
    #[serde(default)]
    pub is_pending: bool,
    pub is_featured: bool,
    pub is_verified: bool,
    pub is_premium: bool,
    pub business_hours: BusinessHours,
    pub social_media: SocialMedia,
    pub custom_fields: CustomFields,
    pub owner_id: Option<UserId>,
    pub claimed_by: Option<UserId>,
    pub claimed_at: Option<NaiveDateTime>,
    pub date_added: NaiveDateTime,
    pub last_updated: NaiveDateTime,
}

/// Data required to create a new [`Business`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBusiness {
    pub name: BusinessName,
    pub category_id: CategoryId,
    pub address: Address,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub phone: Option<PhoneNumber>,
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub website: Option<WebsiteUrl>,
    #[serde(default)]
    pub price_range: PriceRange,
    #[serde(default)]
    pub image_url: Option<ImagePath>,
    #[serde(default)]
    pub images: Vec<ImagePath>,
    #[serde(default)]
    pub business_hours: BusinessHours,
    #[serde(default)]
    pub social_media: SocialMedia,
    #[serde(default)]
    pub custom_fields: CustomFields,
    #[serde(default)]
    pub owner_id: Option<UserId>,
}

impl NewBusiness {
    /// Minimal submission with only the required fields set.
    pub fn new(name: BusinessName, category_id: CategoryId, address: Address) -> Self {
        Self {
            name,
            category_id,
            address,
            description: None,
            short_description: None,
            coordinates: None,
            phone: None,
            email: None,
            website: None,
            price_range: PriceRange::default(),
            image_url: None,
            images: Vec::new(),
            business_hours: BusinessHours::new(),
            social_media: SocialMedia::default(),
            custom_fields: CustomFields::default(),
            owner_id: None,
        }
    }

    /// Builds the stored record with creation defaults.
    ///
    /// New listings start active with no rating, reviews or views, and with
    /// every other status flag cleared.
    pub fn into_business(
        self,
        id: BusinessId,
        slug: Slug,
        category: String,
        now: NaiveDateTime,
    ) -> Business {
        Business {
            id,
            name: self.name,
            slug,
            category_id: self.category_id,
            category,
            description: self.description,
            short_description: self.short_description,
            address: self.address,
            coordinates: self.coordinates,
            phone: self.phone,
            email: self.email,
            website: self.website,
            price_range: self.price_range,
            rating: Rating::default(),
            review_count: ReviewCount::default(),
            view_count: ViewCount::default(),
            image_url: self.image_url,
            images: self.images,
            is_active: true,
            is_pending: false,
            is_featured: false,
            is_verified: false,
            is_premium: false,
            business_hours: self.business_hours,
            social_media: self.social_media,
            custom_fields: self.custom_fields,
            owner_id: self.owner_id,
            claimed_by: None,
            claimed_at: None,
            date_added: now,
            last_updated: now,
        }
    }
}

/// Partial update merged into a stored [`Business`].
///
/// `None` leaves the stored value untouched. Rating, review and view counters
/// are maintained by the directory itself and cannot be patched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessPatch {
    pub name: Option<BusinessName>,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub address: Option<Address>,
    pub coordinates: Option<Coordinates>,
    pub phone: Option<PhoneNumber>,
    pub email: Option<Email>,
    pub website: Option<WebsiteUrl>,
    pub price_range: Option<PriceRange>,
    pub image_url: Option<ImagePath>,
    pub images: Option<Vec<ImagePath>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_verified: Option<bool>,
    pub is_premium: Option<bool>,
    pub business_hours: Option<BusinessHours>,
    pub social_media: Option<SocialMedia>,
    pub custom_fields: Option<CustomFields>,
}

impl BusinessPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Shallow-merges the patch into `business` and refreshes `last_updated`.
    pub fn apply(self, business: &mut Business, now: NaiveDateTime) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field {
                    business.$field = value;
                })*
            };
        }
        macro_rules! merge_optional {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field {
                    business.$field = Some(value);
                })*
            };
        }

        merge!(
            name,
            category_id,
            address,
            price_range,
            images,
            is_active,
            is_featured,
            is_verified,
            is_premium,
            business_hours,
            social_media,
            custom_fields,
        );
        merge_optional!(
            description,
            short_description,
            coordinates,
            phone,
            email,
            website,
            image_url,
        );
        if business.is_active {
            business.is_pending = false;
        }
        business.last_updated = now.max(business.date_added);
    }
}

/// Filters accepted by the unpaginated listing used by the content client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFilters {
    pub category: Option<CategoryId>,
    pub status: Option<BusinessStatus>,
    pub featured: Option<bool>,
    pub limit: Option<usize>,
}

impl BusinessFilters {
    /// Whether `business` passes every filter present.
    pub fn matches(&self, business: &Business) -> bool {
        self.category
            .as_ref()
            .is_none_or(|category| &business.category_id == category)
            && self
                .status
                .is_none_or(|status| status == business.status())
            && self
                .featured
                .is_none_or(|featured| business.is_featured == featured)
    }
}

impl Business {
    /// Publication state derived from the active and pending flags.
    pub fn status(&self) -> BusinessStatus {
        if self.is_active {
            BusinessStatus::Active
        } else if self.is_pending {
            BusinessStatus::Pending
        } else {
            BusinessStatus::Inactive
        }
    }
}

/// A submission accepted for moderation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedBusiness {
    pub id: BusinessId,
    #[serde(flatten)]
    pub submission: NewBusiness,
    pub status: BusinessStatus,
}
