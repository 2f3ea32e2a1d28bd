use crate::dom::{Document, ElementId, Selector};
use crate::error::AppResult;
use crate::event::UiEvent;
use crate::site::{Feature, Handled, PageContext};

pub const PLACEHOLDER_SRC: &str = "https://images.unsplash.com/photo-1543852786-1cf6624b9987?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&q=80";
pub const PLACEHOLDER_ALT: &str = "Image not available";
pub const LAZY_CLASS: &str = "lazy";

/// Swaps a lazy image's `data-src` in. Returns `false` when the image was not
/// lazy.
pub fn load_lazy_image(doc: &mut dyn Document, image: ElementId) -> bool {
    if !doc.has_class(image, LAZY_CLASS) {
        return false;
    }
    if let Some(src) = doc.attr(image, "data-src").filter(|src| !src.is_empty()) {
        doc.set_attr(image, "src", &src);
    }
    doc.remove_class(image, LAZY_CLASS);
    true
}

/// Points a broken image at the placeholder. A failing placeholder is left
/// alone so errors cannot loop.
pub fn substitute_placeholder(doc: &mut dyn Document, image: ElementId) -> bool {
    if doc.attr(image, "src").as_deref() == Some(PLACEHOLDER_SRC) {
        return false;
    }
    doc.set_attr(image, "src", PLACEHOLDER_SRC);
    doc.set_attr(image, "alt", PLACEHOLDER_ALT);
    true
}

/// Lazy loading and broken-image recovery for every `<img>`.
pub struct Media;

#[derive(Debug, Default)]
pub struct MediaState {
    lazy: Vec<ElementId>,
}

impl MediaState {
    pub fn pending_lazy(&self) -> &[ElementId] {
        &self.lazy
    }
}

impl Feature for Media {
    type State = MediaState;

    const NAME: &'static str = "media";

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State> {
        let lazy = ctx
            .doc
            .query_all(&Selector::tag("img").and(Selector::class(LAZY_CLASS)));
        Ok(MediaState { lazy })
    }

    fn handle_ui(
        state: &mut Self::State,
        event: &UiEvent,
        ctx: &mut PageContext<'_>,
    ) -> AppResult<Handled> {
        match event {
            UiEvent::Revealed { target } => {
                if let Some(position) = state.lazy.iter().position(|image| image == target) {
                    state.lazy.swap_remove(position);
                    load_lazy_image(ctx.doc, *target);
                }
                Ok(Handled::Ignored)
            }
            UiEvent::ImageError { target } if ctx.doc.tag(*target) == Some("img") => {
                if substitute_placeholder(ctx.doc, *target) {
                    tracing::debug!(?target, "image failed to load; using placeholder");
                }
                Ok(Handled::Consumed)
            }
            _ => Ok(Handled::Ignored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Media, PLACEHOLDER_ALT, PLACEHOLDER_SRC};
    use crate::dom::{Document, ElementSpec};
    use crate::event::UiEvent;
    use crate::site::Feature;
    use crate::site::test_support::Harness;

    #[test]
    fn revealed_lazy_image_swaps_in_its_source_once() {
        let mut harness = Harness::new("/pets.html");
        let body = harness.doc.body();
        let image = harness
            .doc
            .append_child(
                body,
                ElementSpec::new("img")
                    .class("lazy")
                    .attr("src", "blur.jpg")
                    .attr("data-src", "joe.jpg"),
            )
            .expect("body exists");
        let mut state = Media::mount(&mut harness.ctx()).expect("media mounts");
        assert_eq!(state.pending_lazy(), &[image]);

        let revealed = UiEvent::Revealed { target: image };
        Media::handle_ui(&mut state, &revealed, &mut harness.ctx()).expect("reveal");
        assert_eq!(harness.doc.attr(image, "src").as_deref(), Some("joe.jpg"));
        assert!(!harness.doc.has_class(image, "lazy"));
        assert!(state.pending_lazy().is_empty());
    }

    #[test]
    fn broken_image_gets_placeholder_and_alt() {
        let mut harness = Harness::new("/pets.html");
        let body = harness.doc.body();
        let image = harness
            .doc
            .append_child(
                body,
                ElementSpec::new("img")
                    .attr("src", "missing.jpg")
                    .attr("alt", "Joe"),
            )
            .expect("body exists");
        let mut state = Media::mount(&mut harness.ctx()).expect("media mounts");

        let failed = UiEvent::ImageError { target: image };
        Media::handle_ui(&mut state, &failed, &mut harness.ctx()).expect("error");
        Media::handle_ui(&mut state, &failed, &mut harness.ctx()).expect("second error");
        assert_eq!(harness.doc.attr(image, "src").as_deref(), Some(PLACEHOLDER_SRC));
        assert_eq!(harness.doc.attr(image, "alt").as_deref(), Some(PLACEHOLDER_ALT));
    }
}
