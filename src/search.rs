use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::resource::Resource;

/// Resources matching `query` by name or source, best match first. An empty
/// query keeps everything in its original order.
pub fn filter_resources<'a>(resources: &'a [Resource], query: &str) -> Vec<&'a Resource> {
    let query = query.trim();
    if query.is_empty() {
        return resources.iter().collect();
    }
    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored = resources
        .iter()
        .filter_map(|r| {
            let hay = format!("{} {}", r.name, r.source().unwrap_or(""));
            matcher.fuzzy_match(&hay, query).map(|score| (score, r))
        })
        .collect::<Vec<_>>();
    // Stable sort keeps list order among equal scores.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, r)| r).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<Resource> {
        vec![
            Resource::new("src/components/Button.tsx").with_source("acme/web"),
            Resource::new("docs/guide.md").with_source("acme/handbook"),
            Resource::new("src/lib/button-utils.ts").with_source("acme/web"),
        ]
    }

    #[test]
    fn empty_query_keeps_order() {
        let items = items();
        let out = filter_resources(&items, "  ");
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].name, "src/components/Button.tsx");
    }

    #[test]
    fn matches_name_and_source() {
        let items = items();
        let names: Vec<&str> = filter_resources(&items, "button")
            .into_iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(!names.contains(&"docs/guide.md"));

        let out = filter_resources(&items, "handbook");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "docs/guide.md");
    }

    #[test]
    fn no_match_is_empty() {
        let items = items();
        assert!(filter_resources(&items, "zzzqqq").is_empty());
    }
}
