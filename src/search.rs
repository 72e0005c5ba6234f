//! In-memory business search.
//!
//! Filtering, ordering and paging run over the full list of businesses in
//! insertion order. The same engine backs the store-side search and the local
//! fallback of the content client, so both answer identically.

use std::cmp::Ordering;

use crate::domain::business::Business;
use crate::domain::query::{SearchRequest, SortBy};
use crate::pagination::{Page, Pagination};

/// Whether `business` satisfies every filter in `request`.
///
/// Inactive businesses never match.
pub fn matches(business: &Business, request: &SearchRequest) -> bool {
    if !business.is_active {
        return false;
    }

    if let Some(query) = request.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let needle = query.to_lowercase();
        let hit = business.name.to_lowercase().contains(&needle)
            || business
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
            || business.address.to_lowercase().contains(&needle);
        if !hit {
            return false;
        }
    }

    if !request.category_ids.is_empty() && !request.category_ids.contains(&business.category_id) {
        return false;
    }

    if request
        .rating
        .is_some_and(|min| min > 0.0 && business.rating.get() < min)
    {
        return false;
    }

    if !request.price_ranges.is_empty() && !request.price_ranges.contains(&business.price_range) {
        return false;
    }

    if request.featured == Some(true) && !business.is_featured {
        return false;
    }
    if request.verified == Some(true) && !business.is_verified {
        return false;
    }

    if let (Some(radius), Some(near)) = (request.radius, request.near.as_ref()) {
        if radius.is_finite() && radius >= 0.0 {
            match &business.coordinates {
                Some(at) if at.distance_km(near) <= radius => {}
                _ => return false,
            }
        }
    }

    true
}

fn default_order(a: &Business, b: &Business) -> Ordering {
    b.is_featured
        .cmp(&a.is_featured)
        .then_with(|| b.rating.get().total_cmp(&a.rating.get()))
}

/// Sorts `businesses` in place. The sort is stable: ties keep their incoming order.
pub fn sort(businesses: &mut [Business], request: &SearchRequest) {
    match (request.sort_by, request.near.as_ref()) {
        (Some(SortBy::Rating), _) => businesses.sort_by(|a, b| {
            b.rating
                .get()
                .total_cmp(&a.rating.get())
                .then_with(|| b.review_count.cmp(&a.review_count))
        }),
        (Some(SortBy::Reviews), _) => {
            businesses.sort_by(|a, b| b.review_count.cmp(&a.review_count))
        }
        (Some(SortBy::Name), _) => businesses.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.as_str().cmp(b.name.as_str()))
        }),
        (Some(SortBy::Date), _) => businesses.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
        (Some(SortBy::Distance), Some(near)) => businesses.sort_by(|a, b| {
            let da = a.coordinates.map(|c| c.distance_km(near));
            let db = b.coordinates.map(|c| c.distance_km(near));
            match (da, db) {
                (Some(da), Some(db)) => da.total_cmp(&db),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
        (Some(SortBy::Distance), None) | (None, _) => businesses.sort_by(default_order),
    }
}

/// Filters, orders and pages `businesses` according to `request`.
///
/// `default_limit` is the page size used when the request has none or a
/// non-positive one.
pub fn search_businesses(
    businesses: &[Business],
    request: &SearchRequest,
    default_limit: usize,
) -> Page<Business> {
    let mut matched: Vec<Business> = businesses
        .iter()
        .filter(|b| matches(b, request))
        .cloned()
        .collect();
    sort(&mut matched, request);

    let pagination = Pagination::new(
        request.effective_page(),
        request.effective_limit(default_limit),
    );
    Page::from_all(matched, pagination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CategoryId, Coordinates, PriceRange};
    use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
    use crate::sample::SampleDirectory;

    fn businesses() -> Vec<Business> {
        SampleDirectory::load().unwrap().businesses
    }

    fn names(page: &Page<Business>) -> Vec<&str> {
        page.items.iter().map(|b| b.name.as_str()).collect()
    }

    fn run(request: &SearchRequest) -> Page<Business> {
        search_businesses(&businesses(), request, DEFAULT_ITEMS_PER_PAGE)
    }

    #[test]
    fn empty_request_returns_everything_featured_first() {
        let page = run(&SearchRequest::default());
        assert_eq!(page.pagination.total, 8);
        assert_eq!(
            &names(&page)[..3],
            ["Waterfront Grill", "The Local Bistro", "Dragon Palace"]
        );
    }

    #[test]
    fn minimum_rating_is_inclusive() {
        let page = run(&SearchRequest::default().min_rating(4.7));
        assert_eq!(
            names(&page),
            ["Waterfront Grill", "The Local Bistro", "Dragon Palace"]
        );

        let page = run(&SearchRequest::default().min_rating(4.5));
        assert_eq!(page.pagination.total, 6);
        assert!(page.items.iter().all(|b| b.rating.get() >= 4.5));
    }

    #[test]
    fn category_filter_selects_cafes() {
        let page = run(&SearchRequest::default().category(CategoryId::new("cafes").unwrap()));
        let mut found = names(&page);
        found.sort();
        assert_eq!(found, ["Brew & Bean Cafe", "Healthy Harvest Cafe"]);
    }

    #[test]
    fn second_page_of_name_sorted_cafes() {
        let request = SearchRequest::default()
            .category(CategoryId::new("cafes").unwrap())
            .sort_by(SortBy::Name)
            .paginate(2, 1);
        let page = run(&request);
        assert_eq!(names(&page), ["Healthy Harvest Cafe"]);
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.pagination.page, 2);
    }

    #[test]
    fn inactive_businesses_never_match() {
        let mut all = businesses();
        all[0].is_active = false;
        let page = search_businesses(&all, &SearchRequest::default(), 20);
        assert!(page.items.iter().all(|b| b.id.as_str() != "1"));
        assert_eq!(page.pagination.total, 7);
    }

    #[test]
    fn query_matches_name_description_or_address() {
        let page = run(&SearchRequest::default().query("PIZZA"));
        assert_eq!(names(&page), ["Mario's Pizza Palace"]);

        let page = run(&SearchRequest::default().query("cantonese"));
        assert_eq!(names(&page), ["Dragon Palace"]);

        let page = run(&SearchRequest::default().query("South Yarra"));
        assert_eq!(page.pagination.total, 2);

        let page = run(&SearchRequest::default().query("   "));
        assert_eq!(page.pagination.total, 8);
    }

    #[test]
    fn every_result_satisfies_every_filter() {
        let request = SearchRequest::default()
            .price_range(PriceRange::Moderate)
            .price_range(PriceRange::Budget)
            .min_rating(4.4);
        let page = run(&request);
        assert!(!page.items.is_empty());
        for business in &page.items {
            assert!(business.is_active);
            assert!(business.rating.get() >= 4.4);
            assert!(matches!(
                business.price_range,
                PriceRange::Moderate | PriceRange::Budget
            ));
        }
    }

    #[test]
    fn featured_and_verified_flags() {
        let page = run(&SearchRequest {
            featured: Some(true),
            ..Default::default()
        });
        assert_eq!(page.pagination.total, 3);

        let page = run(&SearchRequest {
            verified: Some(true),
            featured: Some(false),
            ..Default::default()
        });
        assert!(page.items.iter().all(|b| b.is_verified));
    }

    #[test]
    fn pages_reassemble_the_full_result() {
        let all = run(&SearchRequest::default().sort_by(SortBy::Name));
        let mut collected = Vec::new();
        for page in 1..=3 {
            let request = SearchRequest::default().sort_by(SortBy::Name).paginate(page, 3);
            let chunk = run(&request);
            assert_eq!(chunk.pagination.total_pages, 3);
            assert!(chunk.items.len() <= 3);
            collected.extend(chunk.items);
        }
        assert_eq!(collected, all.items);
    }

    #[test]
    fn page_below_one_and_bad_limit_are_clamped() {
        let page = run(&SearchRequest::default().paginate(-3, 0));
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.limit, DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(page.items.len(), 8);
    }

    #[test]
    fn page_past_the_end_is_empty_not_an_error() {
        let page = run(&SearchRequest::default().paginate(10, 5));
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 8);
    }

    #[test]
    fn name_sort_is_idempotent_and_case_insensitive() {
        let once = run(&SearchRequest::default().sort_by(SortBy::Name));
        let mut twice = once.items.clone();
        sort(&mut twice, &SearchRequest::default().sort_by(SortBy::Name));
        assert_eq!(once.items, twice);
        assert_eq!(names(&once)[0], "Brew & Bean Cafe");
        assert_eq!(names(&once)[7], "Waterfront Grill");
    }

    #[test]
    fn rating_sort_breaks_ties_by_review_count() {
        let page = run(&SearchRequest::default().sort_by(SortBy::Rating));
        let pos = |name: &str| names(&page).iter().position(|n| *n == name).unwrap();
        // Both 4.5; Healthy Harvest has more reviews.
        assert!(pos("Healthy Harvest Cafe") < pos("Mario's Pizza Palace"));
    }

    #[test]
    fn date_sort_is_newest_first() {
        let page = run(&SearchRequest::default().sort_by(SortBy::Date));
        assert_eq!(page.items[0].id.as_str(), "8");
        assert_eq!(page.items[7].id.as_str(), "1");
    }

    #[test]
    fn radius_keeps_nearby_businesses() {
        let cbd = Coordinates::new(-37.8136, 144.9631).unwrap();
        let page = run(&SearchRequest::default().within(cbd, 1.0));
        let mut found = names(&page);
        found.sort();
        assert_eq!(
            found,
            ["Dragon Palace", "The Local Bistro", "Waterfront Grill"]
        );
    }

    #[test]
    fn radius_without_reference_point_is_ignored() {
        let page = run(&SearchRequest {
            radius: Some(0.5),
            ..Default::default()
        });
        assert_eq!(page.pagination.total, 8);
    }

    #[test]
    fn distance_sort_puts_unlocated_businesses_last() {
        let mut all = businesses();
        all[7].coordinates = None;
        let cbd = Coordinates::new(-37.8136, 144.9631).unwrap();
        let request = SearchRequest {
            near: Some(cbd),
            sort_by: Some(SortBy::Distance),
            ..Default::default()
        };
        let page = search_businesses(&all, &request, 20);
        assert_eq!(page.items[0].name.as_str(), "Dragon Palace");
        assert_eq!(page.items[7].name.as_str(), "Waterfront Grill");
    }

    #[test]
    fn distance_sort_without_reference_point_uses_default_order() {
        let by_distance = run(&SearchRequest::default().sort_by(SortBy::Distance));
        let default = run(&SearchRequest::default());
        assert_eq!(by_distance.items, default.items);
    }
}
