use crate::dom::{Document, ElementId, Selector};
use crate::error::AppResult;
use crate::site::{Feature, PageContext};

const MAP_TITLE_MARKER: &str = "Location Map";

/// First `iframe` whose title names a location map.
pub fn find_map(doc: &dyn Document) -> Option<ElementId> {
    doc.query_all(&Selector::tag("iframe"))
        .into_iter()
        .find(|frame| {
            doc.attr(*frame, "title")
                .is_some_and(|title| title.contains(MAP_TITLE_MARKER))
        })
}

/// Records `map_loaded` once the embedded map is part of the page.
pub struct MapTracking;

impl Feature for MapTracking {
    type State = Option<ElementId>;

    const NAME: &'static str = "map";

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State> {
        let Some(map) = find_map(ctx.doc) else {
            return Ok(None);
        };
        tracing::debug!("map loaded");
        ctx.track("map", "map_loaded")?;
        Ok(Some(map))
    }
}

#[cfg(test)]
mod tests {
    use super::{MapTracking, find_map};
    use crate::dom::{Document, ElementSpec};
    use crate::site::Feature;
    use crate::site::test_support::Harness;

    #[test]
    fn map_load_is_tracked_once() {
        let mut harness = Harness::new("/contact.html");
        let body = harness.doc.body();
        harness
            .doc
            .append_child(body, ElementSpec::new("iframe").attr("title", "Video"))
            .expect("body exists");
        let map = harness
            .doc
            .append_child(
                body,
                ElementSpec::new("iframe").attr("title", "NCPR Location Map"),
            )
            .expect("body exists");

        let state = MapTracking::mount(&mut harness.ctx()).expect("map mounts");
        assert_eq!(state, Some(map));
        assert_eq!(find_map(&harness.doc), Some(map));
        assert_eq!(
            harness.tracked(),
            vec![("map".to_string(), "map_loaded".to_string())]
        );
    }

    #[test]
    fn pages_without_a_map_track_nothing() {
        let mut harness = Harness::new("/index.html");
        let state = MapTracking::mount(&mut harness.ctx()).expect("map mounts");
        assert!(state.is_none());
        assert!(harness.tracked().is_empty());
    }
}
