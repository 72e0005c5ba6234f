//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::{ValidateEmail, ValidateUrl};

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A numeric value fell outside its allowed range.
    #[error("{0} must be between {1} and {2}")]
    OutOfRange(&'static str, &'static str, &'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// URL validation failed.
    #[error("{0} must be a valid URL")]
    InvalidUrl(&'static str),
    /// Email validation failed.
    #[error("{0} must be a valid email address")]
    InvalidEmail(&'static str),
    /// Slug contained characters outside `[a-z0-9-]` or misplaced hyphens.
    #[error("slug must contain lowercase letters, digits and single hyphens")]
    InvalidSlug,
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

macro_rules! string_newtype_common {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }
        }

        string_newtype_common!($name);
    };
}

/// Macro to generate opaque string identifiers.
///
/// Sample records use short human-readable ids (`"1"`, `"cafes"`); records
/// created at runtime get a UUID v4.
macro_rules! string_id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        non_empty_string_newtype!($name, $doc, $field);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }
        }
    };
}

macro_rules! url_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed URL and validates its format.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = trim_and_require_non_empty(value, $field)?;
                if !trimmed.as_str().validate_url() {
                    return Err(TypeConstraintError::InvalidUrl($field));
                }
                Ok(Self(trimmed))
            }
        }

        string_newtype_common!($name);
    };
}

macro_rules! non_negative_i32_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone,
            Copy,
            Debug,
            Default,
            Serialize,
            Deserialize,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
        )]
        #[serde(try_from = "i32", into = "i32")]
        pub struct $name(i32);

        impl $name {
            /// Constructs a value that must be zero or greater.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value >= 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NegativeNumber($field))
                }
            }

            /// Returns the raw `i32` value.
            pub const fn get(self) -> i32 {
                self.0
            }

            /// Returns the value increased by one, saturating at `i32::MAX`.
            pub const fn incremented(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

string_id_newtype!(BusinessId, "Unique identifier for a business.", "business id");
string_id_newtype!(CategoryId, "Unique identifier for a category.", "category id");
string_id_newtype!(ReviewId, "Unique identifier for a review.", "review id");
string_id_newtype!(BlogPostId, "Unique identifier for a blog post.", "blog post id");
string_id_newtype!(UserId, "Unique identifier for a user.", "user id");
string_id_newtype!(
    CustomFieldId,
    "Unique identifier for a custom field definition.",
    "custom field id"
);

non_empty_string_newtype!(
    BusinessName,
    "Business display name enforcing non-empty values.",
    "name"
);
non_empty_string_newtype!(
    Address,
    "Street address enforcing non-empty values.",
    "address"
);
non_empty_string_newtype!(
    CategoryName,
    "Category name enforcing non-empty values.",
    "category name"
);
non_empty_string_newtype!(
    CategoryIcon,
    "Category icon token or emoji.",
    "category icon"
);
non_empty_string_newtype!(
    PhoneNumber,
    "Contact phone number as entered.",
    "phone"
);
non_empty_string_newtype!(
    ImagePath,
    "Image location, either an absolute URL or a site-relative path.",
    "image"
);
non_empty_string_newtype!(
    ReviewContent,
    "Review body enforcing non-empty values.",
    "review content"
);
non_empty_string_newtype!(
    PersonName,
    "Name of a person (user, author, responder).",
    "name"
);
non_empty_string_newtype!(BlogTitle, "Blog post title.", "title");
non_empty_string_newtype!(
    CustomFieldKey,
    "Key under which a custom field value is stored.",
    "custom field key"
);

url_string_newtype!(WebsiteUrl, "Public website of a business.", "website");

non_negative_i32_newtype!(
    ReviewCount,
    "Number of reviews recorded for a business.",
    "review count"
);
non_negative_i32_newtype!(ViewCount, "Number of detail views.", "view count");
non_negative_i32_newtype!(
    HelpfulVotes,
    "Number of helpful votes on a review.",
    "helpful votes"
);
non_negative_i32_newtype!(
    BusinessCount,
    "Number of businesses in a category.",
    "business count"
);

/// Validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Trims, lowercases and validates an email address.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "email")?.to_lowercase();
        if !trimmed.as_str().validate_email() {
            return Err(TypeConstraintError::InvalidEmail("email"));
        }
        Ok(Self(trimmed))
    }
}

string_newtype_common!(Email);

/// URL-safe identifier derived from a display name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Accepts an already-formed slug matching `^[a-z0-9]+(-[a-z0-9]+)*$`.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = trim_and_require_non_empty(value, "slug")?;
        let well_formed = value
            .split('-')
            .all(|part| {
                !part.is_empty()
                    && part
                        .bytes()
                        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
            });
        if well_formed {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidSlug)
        }
    }

    /// Derives a slug from free text.
    ///
    /// The text is lowercased and every run of characters outside `[a-z0-9]`
    /// becomes a single hyphen; leading and trailing hyphens are dropped.
    pub fn from_text(text: &str) -> Result<Self, TypeConstraintError> {
        let mut slug = String::with_capacity(text.len());
        let mut pending_hyphen = false;
        for ch in text.to_lowercase().chars() {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(ch);
            } else {
                pending_hyphen = true;
            }
        }
        if slug.is_empty() {
            return Err(TypeConstraintError::EmptyString("slug"));
        }
        Ok(Self(slug))
    }

    /// Like [`Slug::from_text`], but text without ASCII letters or digits
    /// yields `{prefix}-{first 8 characters of id}` instead of an error.
    pub fn from_text_or_id(
        text: &str,
        prefix: &str,
        id: &str,
    ) -> Result<Self, TypeConstraintError> {
        Self::from_text(text).or_else(|_| {
            let short_id: String = id.chars().take(8).collect();
            Self::from_text(&format!("{prefix} {short_id}"))
        })
    }

    /// Returns the slug with a numeric suffix, used to resolve collisions.
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}-{n}", self.0))
    }
}

string_newtype_common!(Slug);

/// Average rating of a business, a decimal in `[0, 5]`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    pub const MAX: f64 = 5.0;

    /// Constructs a finite rating between zero and five inclusive.
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && (0.0..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::OutOfRange("rating", "0", "5"))
        }
    }

    /// Average of review scores rounded to two decimals, zero when empty.
    pub fn average_of(scores: &[ReviewRating]) -> Self {
        if scores.is_empty() {
            return Self(0.0);
        }
        let sum: i32 = scores.iter().map(|s| s.get()).sum();
        let avg = f64::from(sum) / scores.len() as f64;
        Self((avg * 100.0).round() / 100.0)
    }

    /// Returns the raw `f64` value.
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Rating {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl PartialEq<f64> for Rating {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

/// Score given in a single review, an integer from one to five.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "i32", into = "i32")]
pub struct ReviewRating(i32);

impl ReviewRating {
    /// Constructs a review score in `1..=5`.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::OutOfRange("review rating", "1", "5"))
        }
    }

    /// Returns the raw score.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for ReviewRating {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReviewRating> for i32 {
    fn from(value: ReviewRating) -> Self {
        value.0
    }
}

/// Price band shown on listings.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriceRange {
    #[default]
    #[serde(rename = "$")]
    Budget,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Expensive,
    #[serde(rename = "$$$$")]
    Luxury,
}

impl PriceRange {
    /// String representation used in persistence and on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "$",
            Self::Moderate => "$$",
            Self::Expensive => "$$$",
            Self::Luxury => "$$$$",
        }
    }
}

impl Display for PriceRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PriceRange {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "$" => Ok(Self::Budget),
            "$$" => Ok(Self::Moderate),
            "$$$" => Ok(Self::Expensive),
            "$$$$" => Ok(Self::Luxury),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "price range: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for PriceRange {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

/// Geographic point in decimal degrees.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Constructs a point, rejecting latitudes outside ±90 and longitudes outside ±180.
    pub fn new(lat: f64, lng: f64) -> Result<Self, TypeConstraintError> {
        if !(lat.is_finite() && (-90.0..=90.0).contains(&lat)) {
            return Err(TypeConstraintError::OutOfRange("latitude", "-90", "90"));
        }
        if !(lng.is_finite() && (-180.0..=180.0).contains(&lng)) {
            return Err(TypeConstraintError::OutOfRange("longitude", "-180", "180"));
        }
        Ok(Self { lat, lng })
    }

    /// Great-circle distance in kilometres (haversine formula).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * Self::EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

/// Publication state of a business listing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    Active,
    Pending,
    Inactive,
}

impl BusinessStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Inactive => "inactive",
        }
    }
}

impl TryFrom<&str> for BusinessStatus {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "active" => Ok(Self::Active),
            "pending" => Ok(Self::Pending),
            "inactive" => Ok(Self::Inactive),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "business status: {other}"
            ))),
        }
    }
}

/// Access role of a directory user.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    BusinessOwner,
    Admin,
    Moderator,
}

impl UserRole {
    /// String representation used in persistence.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::BusinessOwner => "business_owner",
            Self::Admin => "admin",
            Self::Moderator => "moderator",
        }
    }
}

impl TryFrom<&str> for UserRole {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "user" => Ok(Self::User),
            "business_owner" => Ok(Self::BusinessOwner),
            "admin" => Ok(Self::Admin),
            "moderator" => Ok(Self::Moderator),
            other => Err(TypeConstraintError::InvalidValue(format!("user role: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_non_empty_strings() {
        let value = BusinessName::new("  The Local Bistro  ").unwrap();
        assert_eq!(value.as_str(), "The Local Bistro");
    }

    #[test]
    fn rejects_blank_ids() {
        let err = BusinessId::new("   ").unwrap_err();
        assert_eq!(err, TypeConstraintError::EmptyString("business id"));
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(BusinessId::generate(), BusinessId::generate());
    }

    #[test]
    fn validates_urls() {
        assert!(WebsiteUrl::new("https://localbistro.com.au").is_ok());
        let err = WebsiteUrl::new("not-a-url").unwrap_err();
        assert_eq!(err, TypeConstraintError::InvalidUrl("website"));
    }

    #[test]
    fn validates_and_lowercases_email() {
        assert_eq!(
            Email::new("Info@LocalBistro.com.au").unwrap().as_str(),
            "info@localbistro.com.au"
        );
        assert!(Email::new("nope").is_err());
    }

    #[test]
    fn slug_from_punctuated_name() {
        let slug = Slug::from_text("Joe's Café & Bar!!").unwrap();
        assert_eq!(slug.as_str(), "joe-s-caf-bar");
        assert!(Slug::new(slug.as_str()).is_ok());
    }

    #[test]
    fn slug_from_text_trims_hyphens() {
        assert_eq!(Slug::from_text("  --New Spot--  ").unwrap().as_str(), "new-spot");
        assert_eq!(
            Slug::from_text("!!!").unwrap_err(),
            TypeConstraintError::EmptyString("slug")
        );
    }

    #[test]
    fn slug_falls_back_to_id_for_non_latin_text() {
        let id = "3f2a9c1e-77b0-4d2e-9a51-0c6d8e2f4b13";
        let slug = Slug::from_text_or_id("日本料理", "business", id).unwrap();
        assert_eq!(slug.as_str(), "business-3f2a9c1e");
        assert!(Slug::new(slug.as_str()).is_ok());

        let named = Slug::from_text_or_id("Sushi Bar", "business", id).unwrap();
        assert_eq!(named.as_str(), "sushi-bar");
    }

    #[test]
    fn slug_rejects_double_hyphen() {
        assert_eq!(Slug::new("a--b").unwrap_err(), TypeConstraintError::InvalidSlug);
        assert_eq!(Slug::new("-a").unwrap_err(), TypeConstraintError::InvalidSlug);
        assert_eq!(Slug::new("A").unwrap_err(), TypeConstraintError::InvalidSlug);
    }

    #[test]
    fn rating_is_bounded() {
        assert!(Rating::new(0.0).is_ok());
        assert!(Rating::new(5.0).is_ok());
        assert!(Rating::new(5.01).is_err());
        assert!(Rating::new(f64::NAN).is_err());
    }

    #[test]
    fn average_rating_rounds_to_two_decimals() {
        let scores = [5, 4, 4].map(|s| ReviewRating::new(s).unwrap());
        assert_eq!(Rating::average_of(&scores).get(), 4.33);
        assert_eq!(Rating::average_of(&[]).get(), 0.0);
    }

    #[test]
    fn review_rating_range() {
        assert!(ReviewRating::new(1).is_ok());
        assert!(ReviewRating::new(0).is_err());
        assert!(ReviewRating::new(6).is_err());
    }

    #[test]
    fn price_range_round_trips_through_strings() {
        let range = PriceRange::try_from("$$$").unwrap();
        assert_eq!(range, PriceRange::Expensive);
        assert_eq!(range.as_str(), "$$$");
        assert_eq!(serde_json::to_value(range).unwrap(), serde_json::json!("$$$"));
        assert!(PriceRange::try_from("$$$$$").is_err());
    }

    #[test]
    fn haversine_distance_between_melbourne_points() {
        let cbd = Coordinates::new(-37.8136, 144.9631).unwrap();
        let southbank = Coordinates::new(-37.8226, 144.9643).unwrap();
        let d = cbd.distance_km(&southbank);
        assert!((0.9..1.1).contains(&d), "distance was {d}");
        assert_eq!(cbd.distance_km(&cbd), 0.0);
    }

    #[test]
    fn coordinates_reject_out_of_range() {
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -181.0).is_err());
    }
}
